use crate::domain::model::{AnalysisReport, AnalysisResult, ExportFormat};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::validate_output_formats;
use chrono::NaiveDate;
use serde_json::Value;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const GROCERY_TEXT_FILE: &str = "grocery-list.txt";
pub const GROCERY_CSV_FILE: &str = "grocery-list.csv";
const CSV_HEADER: [&str; 5] = ["category", "item", "quantity", "priority", "nutritional_benefit"];

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_path: String,
    pub formats: Vec<ExportFormat>,
    pub bundle: bool,
}

impl ExportOptions {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self {
            output_path: config.output_path().to_string(),
            formats: validate_output_formats("output_formats", config.output_formats())?,
            bundle: config.bundle(),
        })
    }
}

/// Writes an analysis to storage as the plan JSON and grocery lists.
pub struct ReportExporter<S: Storage> {
    storage: S,
    options: ExportOptions,
    date: NaiveDate,
}

impl<S: Storage> ReportExporter<S> {
    pub fn new(storage: S, options: ExportOptions) -> Self {
        Self {
            storage,
            options,
            date: chrono::Local::now().date_naive(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn plan_file_name(&self) -> String {
        format!("nutrition-plan-{}.json", self.date.format("%Y-%m-%d"))
    }

    pub fn bundle_file_name(&self) -> String {
        format!("nutrition-plan-{}.zip", self.date.format("%Y-%m-%d"))
    }

    pub async fn export(&self, report: &AnalysisReport) -> Result<Vec<String>> {
        let mut files = Vec::with_capacity(self.options.formats.len());
        for format in &self.options.formats {
            let file = match format {
                ExportFormat::Json => (
                    self.plan_file_name(),
                    serde_json::to_vec_pretty(&report.analysis)?,
                ),
                ExportFormat::Text => (
                    GROCERY_TEXT_FILE.to_string(),
                    grocery_list_text(&report.analysis).into_bytes(),
                ),
                ExportFormat::Csv => (
                    GROCERY_CSV_FILE.to_string(),
                    grocery_list_csv(&report.analysis)?,
                ),
            };
            files.push(file);
        }

        let written = if self.options.bundle {
            let name = self.bundle_file_name();
            tracing::debug!("Creating ZIP bundle with {} files", files.len());
            let data = zip_files(&files)?;
            self.storage.write_file(&name, &data).await?;
            vec![name]
        } else {
            for (name, data) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, data.len());
                self.storage.write_file(name, data).await?;
            }
            files.into_iter().map(|(name, _)| name).collect()
        };

        Ok(written
            .into_iter()
            .map(|name| format!("{}/{}", self.options.output_path, name))
            .collect())
    }
}

/// Printable checklist: one upper-cased heading per category, one `□` line per item.
pub fn grocery_list_text(analysis: &AnalysisResult) -> String {
    analysis
        .grocery_sections()
        .into_iter()
        .map(|(category, items)| {
            let heading = category.replace('_', " ").to_uppercase();
            let lines: Vec<String> = items
                .iter()
                .map(|item| {
                    format!(
                        "  □ {} - {}",
                        item_field(item, "item"),
                        item_field(item, "quantity")
                    )
                })
                .collect();
            format!("{}\n{}", heading, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn grocery_list_csv(analysis: &AnalysisResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (category, items) in analysis.grocery_sections() {
        for item in items {
            writer.write_record([
                category.to_string(),
                item_field(item, "item"),
                item_field(item, "quantity"),
                item_field(item, "priority"),
                item_field(item, "nutritional_benefit"),
            ])?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| {
            let err = e.error();
            AnalysisError::IoError(std::io::Error::new(err.kind(), err.to_string()))
        })
}

fn item_field(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::{normalize, parse_and_normalize};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AnalysisError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn sample_report() -> AnalysisReport {
        let map = match json!({
            "grocery_list": {
                "proteins": [
                    {"item": "Lentils", "quantity": "500g", "priority": "essential", "nutritional_benefit": "Iron"},
                    {"item": "Salmon", "quantity": "2 fillets", "priority": "recommended"}
                ],
                "vegetables": [],
                "healthy_fats_and_oils": [{"item": "Olive oil", "quantity": 1}]
            }
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        AnalysisReport {
            analysis: normalize(map),
            model: "gemini-2.5-flash".to_string(),
        }
    }

    fn options(formats: Vec<ExportFormat>, bundle: bool) -> ExportOptions {
        ExportOptions {
            output_path: "out".to_string(),
            formats,
            bundle,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_grocery_text_format() {
        let text = grocery_list_text(&sample_report().analysis);
        assert_eq!(
            text,
            "PROTEINS\n  □ Lentils - 500g\n  □ Salmon - 2 fillets\n\nHEALTHY FATS AND OILS\n  □ Olive oil - 1"
        );
    }

    #[test]
    fn test_grocery_text_empty_for_default_list() {
        let analysis = parse_and_normalize("{}").into_result();
        assert_eq!(grocery_list_text(&analysis), "");
    }

    #[test]
    fn test_grocery_csv() {
        let csv = String::from_utf8(grocery_list_csv(&sample_report().analysis).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "category,item,quantity,priority,nutritional_benefit");
        assert_eq!(lines[1], "proteins,Lentils,500g,essential,Iron");
        assert_eq!(lines[2], "proteins,Salmon,2 fillets,recommended,");
        assert_eq!(lines[3], "healthy_fats_and_oils,Olive oil,1,,");
        assert_eq!(lines.len(), 4);
    }

    #[tokio::test]
    async fn test_export_writes_each_format() {
        let storage = MockStorage::new();
        let exporter = ReportExporter::new(
            storage.clone(),
            options(vec![ExportFormat::Json, ExportFormat::Text], false),
        )
        .with_date(date());

        let paths = exporter.export(&sample_report()).await.unwrap();

        assert_eq!(
            paths,
            vec![
                "out/nutrition-plan-2024-03-15.json".to_string(),
                "out/grocery-list.txt".to_string()
            ]
        );
        let json_bytes = storage.get_file("nutrition-plan-2024-03-15.json").await.unwrap();
        let exported: Value = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(exported["grocery_list"]["proteins"][0]["item"], json!("Lentils"));
        assert!(exported.get("disclaimer").is_some());
        assert!(storage.get_file(GROCERY_CSV_FILE).await.is_none());
    }

    #[test]
    fn test_export_bundle_contains_all_files() {
        let storage = MockStorage::new();
        let exporter = ReportExporter::new(
            storage.clone(),
            options(
                vec![ExportFormat::Json, ExportFormat::Text, ExportFormat::Csv],
                true,
            ),
        )
        .with_date(date());

        let paths = tokio_test::block_on(exporter.export(&sample_report())).unwrap();
        assert_eq!(paths, vec!["out/nutrition-plan-2024-03-15.zip".to_string()]);

        let zip_bytes = tokio_test::block_on(storage.get_file("nutrition-plan-2024-03-15.zip"))
            .unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "grocery-list.csv",
                "grocery-list.txt",
                "nutrition-plan-2024-03-15.json"
            ]
        );

        let mut text = String::new();
        std::io::Read::read_to_string(&mut archive.by_name(GROCERY_TEXT_FILE).unwrap(), &mut text)
            .unwrap();
        assert!(text.starts_with("PROTEINS\n"));
    }
}
