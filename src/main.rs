// ==========================================
// 易腐库存管理 - 命令行入口
// ==========================================
// 用法:
//   perishable-inventory [--db <path>] <command> [args]
//
// 命令:
//   import <file.csv> [--user <id>]     上传商品目录（以 MODERADOR 身份）
//   products                            列出商品
//   search <query>                      按名称搜索商品
//   add-entry <product_id> <date> [qty] 登记批次
//   mark-expired <entry_id>             标记批次过期
//   expiration [--status S] [--date D]  效期视图
//   summary [--date D]                  效期汇总
//   uploads                             上传记录
// ==========================================

use chrono::{Local, NaiveDate};
use perishable_inventory::api::{CreateEntryRequest, UploadRequest};
use perishable_inventory::app::{get_default_db_path, AppState};
use perishable_inventory::domain::types::{Caller, FreshnessTier};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// 解析后的命令行参数
struct CliArgs {
    db_path: String,
    command: String,
    positional: Vec<String>,
    user_id: i64,
    status: Option<FreshnessTier>,
    date: Option<NaiveDate>,
}

fn parse_args() -> CliResult<CliArgs> {
    let mut db_path = None;
    let mut user_id = 1;
    let mut status = None;
    let mut date = None;
    let mut rest = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(args.next().ok_or("--db 缺少参数")?),
            "--user" => user_id = args.next().ok_or("--user 缺少参数")?.parse()?,
            "--status" => status = Some(args.next().ok_or("--status 缺少参数")?.parse::<FreshnessTier>()?),
            "--date" => {
                let raw = args.next().ok_or("--date 缺少参数")?;
                date = Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?);
            }
            _ => rest.push(arg),
        }
    }

    if rest.is_empty() {
        return Err(usage().into());
    }
    let command = rest.remove(0);

    Ok(CliArgs {
        db_path: db_path.unwrap_or_else(get_default_db_path),
        command,
        positional: rest,
        user_id,
        status,
        date,
    })
}

fn usage() -> String {
    "用法: perishable-inventory [--db <path>] <import|products|search|add-entry|mark-expired|expiration|summary|uploads> [args]"
        .to_string()
}

fn positional(args: &CliArgs, index: usize, name: &str) -> CliResult<String> {
    args.positional
        .get(index)
        .cloned()
        .ok_or_else(|| format!("缺少参数: {}", name).into())
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    perishable_inventory::logging::init();

    let args = parse_args()?;
    tracing::info!(
        version = perishable_inventory::VERSION,
        db_path = %args.db_path,
        command = %args.command,
        "{}",
        perishable_inventory::APP_NAME
    );

    let state = AppState::new(args.db_path.clone())?;
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());

    match args.command.as_str() {
        "import" => {
            let file = positional(&args, 0, "file")?;
            let csv = tokio::fs::read_to_string(&file).await?;
            let filename = Path::new(&file)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string);
            let caller = Caller::moderator(args.user_id);
            let response = state
                .import_api
                .upload_inventory(
                    Some(&caller),
                    UploadRequest {
                        csv: Some(csv),
                        filename,
                    },
                )
                .await?;
            print_json(&response)?;
        }
        "products" => print_json(&state.product_api.list_products()?)?,
        "search" => {
            let query = positional(&args, 0, "query")?;
            print_json(&state.product_api.search_products(&query)?)?;
        }
        "add-entry" => {
            let product_id = positional(&args, 0, "product_id")?.parse()?;
            let expiration_date = positional(&args, 1, "date")?;
            let quantity = match args.positional.get(2) {
                Some(raw) => Some(raw.parse()?),
                None => None,
            };
            let entry = state.product_api.create_entry(CreateEntryRequest {
                product_id,
                expiration_date,
                quantity,
                notes: None,
            })?;
            print_json(&entry)?;
        }
        "mark-expired" => {
            let entry_id = positional(&args, 0, "entry_id")?.parse()?;
            print_json(&state.product_api.mark_entry_expired(entry_id)?)?;
        }
        "expiration" => {
            let views = match args.status {
                Some(tier) => state.expiration_api.list_by_status_at(tier, today)?,
                None => state.expiration_api.list_with_expiration_at(today)?,
            };
            print_json(&views)?;
        }
        "summary" => print_json(&state.expiration_api.get_expiration_summary_at(today)?)?,
        "uploads" => print_json(&state.import_api.list_uploads()?)?,
        other => return Err(format!("未知命令: {}\n{}", other, usage()).into()),
    }

    Ok(())
}
