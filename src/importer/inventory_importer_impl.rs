// ==========================================
// 易腐库存管理 - 库存导入器实现
// ==========================================
// 职责: 整合导入流程，从 CSV 文本到数据库
// 流程: 解析 → 文件内去重(可选) → 库存比对 → 批量插入(失败转逐行) → 上传记录
// 策略: 部分成功。单行失败只记诊断并跳过，不回滚整个上传
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::product::{NewProduct, Product, ProductCandidate};
use crate::domain::types::UploadStatus;
use crate::domain::upload::NewInventoryUpload;
use crate::importer::catalog_parser::{parse_with_mapper, ParsedCatalog};
use crate::importer::conflict_handler::{ConflictHandler as DefaultConflictHandler, DedupKey};
use crate::importer::diagnostics::{
    ImportDiagnostic, ImportEvent, ImportObserver, SkipReason, TracingObserver,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as DefaultFieldMapper;
use crate::importer::inventory_importer_trait::{ConflictHandler, FieldMapper, InventoryImporter};
use crate::importer::outcome::{ImportOutcome, ImportSummary};
use crate::repository::ProductImportRepository;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// InventoryImporterImpl - 库存导入器实现
// ==========================================
pub struct InventoryImporterImpl<R, C>
where
    R: ProductImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    field_mapper: Box<dyn FieldMapper>,
    conflict_handler: Box<dyn ConflictHandler>,

    // 遥测
    observer: Arc<dyn ImportObserver>,
}

impl<R, C> InventoryImporterImpl<R, C>
where
    R: ProductImportRepository,
    C: ImportConfigReader,
{
    /// 创建新的 InventoryImporter 实例
    ///
    /// # 参数
    /// - import_repo: 导入数据仓储
    /// - config: 配置读取器
    /// - field_mapper: 字段映射器
    /// - conflict_handler: 冲突处理器
    /// - observer: 导入事件观察者
    pub fn new(
        import_repo: R,
        config: C,
        field_mapper: Box<dyn FieldMapper>,
        conflict_handler: Box<dyn ConflictHandler>,
        observer: Arc<dyn ImportObserver>,
    ) -> Self {
        Self {
            import_repo,
            config,
            field_mapper,
            conflict_handler,
            observer,
        }
    }

    /// 使用默认组件（tracing 观察者）创建
    pub fn with_defaults(import_repo: R, config: C) -> Self {
        Self::new(
            import_repo,
            config,
            Box::new(DefaultFieldMapper::default()),
            Box::new(DefaultConflictHandler),
            Arc::new(TracingObserver),
        )
    }

    fn emit(&self, run_id: &str, event: ImportEvent) {
        self.observer.on_event(run_id, &event);
    }
}

#[async_trait::async_trait]
impl<R, C> InventoryImporter for InventoryImporterImpl<R, C>
where
    R: ProductImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, text), fields(run_id, text_len = text.len()))]
    async fn import_csv_text(
        &self,
        text: &str,
        filename: &str,
        uploaded_by: i64,
    ) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(run_id = %run_id, filename = %filename, "开始导入商品目录");

        // === 步骤 1: 解析 ===
        debug!("步骤 1: 解析 CSV");
        let parsed = parse_with_mapper(text, self.field_mapper.as_ref()).map_err(|e| {
            error!(run_id = %run_id, error = %e, "CSV 解析失败，整个文件被拒绝");
            e
        })?;
        self.report_parse(&run_id, &parsed);

        let ParsedCatalog {
            total_rows,
            candidates,
            mut diagnostics,
            ..
        } = parsed;
        let mut summary = ImportSummary {
            total_rows,
            candidates: candidates.len(),
            skipped_rows: diagnostics.len(),
            ..Default::default()
        };

        // === 步骤 2: 文件内去重（可选） ===
        debug!("步骤 2: 文件内去重");
        let candidates = if self.read_dedupe_within_file().await? {
            let (kept, dups) = self.drop_in_file_duplicates(candidates);
            summary.duplicates_in_file = dups.len();
            for diag in dups {
                self.emit(&run_id, ImportEvent::RowSkipped(diag.clone()));
                diagnostics.push(diag);
            }
            kept
        } else {
            candidates
        };

        // === 步骤 3: 库存比对 ===
        debug!("步骤 3: 库存比对");
        let dedup_key = self.read_dedup_key().await?;
        let partitioned = self.partition_against_store(candidates, dedup_key).await?;
        summary.existing = partitioned.existing.len();
        for existing in &partitioned.existing {
            diagnostics.push(ImportDiagnostic::new(
                existing.line_number,
                Some(existing.name.clone()),
                SkipReason::AlreadyExists,
                format!("商品已存在: {}", existing.name),
            ));
        }
        self.emit(
            &run_id,
            ImportEvent::ExistingSkipped {
                count: summary.existing,
            },
        );

        // === 步骤 4: 插入 ===
        debug!("步骤 4: 插入商品");
        let (created, failures) = self.insert_candidates(&run_id, partitioned.to_create).await;
        summary.inserted = created.len();
        summary.failed = failures.len();
        diagnostics.extend(failures);

        // === 步骤 5: 上传记录 ===
        debug!("步骤 5: 写入上传记录");
        let upload = self
            .import_repo
            .insert_upload(NewInventoryUpload {
                filename: filename.to_string(),
                uploaded_by,
                products_count: created.len() as i64,
                status: UploadStatus::Active,
            })
            .await?;

        let elapsed_ms = start_time.elapsed().as_millis();
        self.emit(
            &run_id,
            ImportEvent::ImportCompleted {
                inserted: summary.inserted,
                skipped: diagnostics.len(),
                elapsed_ms,
            },
        );

        Ok(ImportOutcome {
            run_id,
            upload,
            created,
            diagnostics,
            summary,
            elapsed_ms,
        })
    }

    async fn import_csv_file(&self, path: &Path, uploaded_by: i64) -> ImportResult<ImportOutcome> {
        let text = tokio::fs::read_to_string(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        let filename = match filename {
            Some(name) => name,
            None => self.read_default_filename().await?,
        };
        self.import_csv_text(&text, &filename, uploaded_by).await
    }
}

// 辅助方法
impl<R, C> InventoryImporterImpl<R, C>
where
    R: ProductImportRepository,
    C: ImportConfigReader,
{
    /// 解析阶段事件
    fn report_parse(&self, run_id: &str, parsed: &ParsedCatalog) {
        self.emit(
            run_id,
            ImportEvent::DelimiterDetected {
                delimiter: parsed.decision.delimiter,
            },
        );
        self.emit(
            run_id,
            ImportEvent::FormatDetected {
                mode: parsed.decision.mode.label().to_string(),
                has_header: parsed.decision.has_header,
                header_line: parsed.decision.header_line,
            },
        );
        for diag in &parsed.diagnostics {
            self.emit(run_id, ImportEvent::RowSkipped(diag.clone()));
        }
        self.emit(
            run_id,
            ImportEvent::CandidatesReady {
                total_rows: parsed.total_rows,
                candidates: parsed.candidates.len(),
            },
        );
    }

    /// 文件内重复: 保留首次出现
    fn drop_in_file_duplicates(
        &self,
        candidates: Vec<ProductCandidate>,
    ) -> (Vec<ProductCandidate>, Vec<ImportDiagnostic>) {
        let duplicates = self.conflict_handler.detect_duplicates(&candidates);
        let dup_lines: HashSet<u64> = duplicates.iter().map(|(line, _)| *line).collect();

        let diagnostics = duplicates
            .into_iter()
            .map(|(line, name)| {
                ImportDiagnostic::new(
                    line,
                    Some(name.clone()),
                    SkipReason::DuplicateInFile,
                    format!("文件内重复: {}", name),
                )
            })
            .collect();

        let kept = candidates
            .into_iter()
            .filter(|c| !dup_lines.contains(&c.line_number))
            .collect();

        (kept, diagnostics)
    }

    /// 与库中商品比对
    async fn partition_against_store(
        &self,
        candidates: Vec<ProductCandidate>,
        dedup_key: DedupKey,
    ) -> ImportResult<crate::importer::conflict_handler::Partitioned> {
        let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        let existing_names = self.import_repo.find_existing_names(names).await?;

        let existing_codes = if dedup_key.uses_code() {
            let codes: Vec<String> = candidates.iter().filter_map(|c| c.code.clone()).collect();
            self.import_repo.find_existing_codes(codes).await?
        } else {
            HashSet::new()
        };

        Ok(self
            .conflict_handler
            .partition_existing(candidates, &existing_names, &existing_codes))
    }

    /// 批量插入，失败后逐行插入
    ///
    /// # 返回
    /// - (成功插入的商品, 逐行失败诊断)
    async fn insert_candidates(
        &self,
        run_id: &str,
        to_create: Vec<ProductCandidate>,
    ) -> (Vec<Product>, Vec<ImportDiagnostic>) {
        if to_create.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let batch: Vec<NewProduct> = to_create.iter().map(ProductCandidate::to_new_product).collect();
        let bulk_error = match self.import_repo.batch_insert_products(batch).await {
            Ok(created) => {
                info!(run_id = %run_id, count = created.len(), "批量插入完成");
                return (created, Vec::new());
            }
            Err(e) => e,
        };

        self.emit(
            run_id,
            ImportEvent::BulkInsertFailed {
                error: bulk_error.to_string(),
                pending: to_create.len(),
            },
        );

        let mut created = Vec::with_capacity(to_create.len());
        let mut failures = Vec::new();
        for candidate in to_create {
            let line = candidate.line_number;
            let name = candidate.name.clone();
            match self.import_repo.insert_product(candidate.into()).await {
                Ok(product) => created.push(product),
                Err(e) => {
                    self.emit(
                        run_id,
                        ImportEvent::RowInsertFailed {
                            line,
                            name: name.clone(),
                            error: e.to_string(),
                        },
                    );
                    failures.push(ImportDiagnostic::new(
                        line,
                        Some(name),
                        SkipReason::InsertFailed,
                        format!("插入失败: {}", e),
                    ));
                }
            }
        }

        (created, failures)
    }

    // ===== 配置读取 =====

    async fn read_dedup_key(&self) -> ImportResult<DedupKey> {
        self.config
            .get_dedup_key()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: crate::config::config_keys::IMPORT_DEDUP_KEY.to_string(),
                message: e.to_string(),
            })
    }

    async fn read_dedupe_within_file(&self) -> ImportResult<bool> {
        self.config
            .get_dedupe_within_file()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: crate::config::config_keys::IMPORT_DEDUPE_WITHIN_FILE.to_string(),
                message: e.to_string(),
            })
    }

    async fn read_default_filename(&self) -> ImportResult<String> {
        self.config
            .get_default_upload_filename()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: crate::config::config_keys::UPLOAD_DEFAULT_FILENAME.to_string(),
                message: e.to_string(),
            })
    }
}
