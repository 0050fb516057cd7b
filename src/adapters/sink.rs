use crate::domain::model::CourtRecord;
use crate::domain::ports::{OutputFormat, RecordSink};
use crate::utils::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 表頭，順序與 `CourtRecord` 欄位一致
pub const COLUMN_TITLES: [&str; 6] = [
    "Регион суда",
    "Наименование суда",
    "Код суда",
    "Веб-сайт",
    "Адрес суда",
    "Код суда (ej.sudrf.ru) - признак наличия",
];

/// CSV / TSV 輸出，表頭取自 `CourtRecord` 的欄位名稱
pub struct DelimitedSink {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl DelimitedSink {
    pub fn create(path: &Path, delimiter: u8) -> Result<Self> {
        // 表頭在建立時就寫出，沒有任何記錄時檔案也有表頭
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(COLUMN_TITLES)?;
        writer.flush()?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }
}

impl RecordSink for DelimitedSink {
    fn append(&mut self, record: &CourtRecord) -> Result<()> {
        self.writer.serialize(record)?;
        // 逐筆 flush，中途中斷也保留已寫出的列
        self.writer.flush()?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String> {
        self.writer.flush()?;
        Ok(self.path.display().to_string())
    }
}

/// 每行一個 JSON 物件
pub struct JsonLinesSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            path: path.to_path_buf(),
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn append(&mut self, record: &CourtRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String> {
        self.writer.flush()?;
        Ok(self.path.display().to_string())
    }
}

/// 依格式開啟輸出檔，必要時建立上層目錄
pub fn open_sink(path: &str, format: OutputFormat) -> Result<Box<dyn RecordSink>> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let sink: Box<dyn RecordSink> = match format {
        OutputFormat::Csv => Box::new(DelimitedSink::create(path, b',')?),
        OutputFormat::Tsv => Box::new(DelimitedSink::create(path, b'\t')?),
        OutputFormat::Jsonl => Box::new(JsonLinesSink::create(path)?),
    };
    Ok(sink)
}
