//! CSV snapshot of the symbol catalog
//!
//! The snapshot is trusted for 24h after its last write, judged by the
//! file's modification time. Writes go to a sibling temp file that is
//! renamed into place, so readers never see a half-written snapshot.

use crate::core::symbol::non_empty;
use crate::core::{Catalog, Symbol, TradingStatus};
use crate::infrastructure::config::CacheConfig;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Snapshot file name inside the cache directory
pub const CACHE_FILE_NAME: &str = "symbols.csv";

/// Maximum snapshot age
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Column order of the snapshot file
pub const HEADER: [&str; 5] = ["ticker", "name", "lotSize", "tickSize", "tradingStatus"];

/// Symbol snapshot on durable storage
#[derive(Debug, Clone)]
pub struct SymbolCache {
    path: PathBuf,
}

impl SymbolCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.dir.join(CACHE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot exists and was written less than 24h ago
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(SystemTime::now())
    }

    /// Freshness as seen at `now`. Any probe failure reads as stale.
    pub fn is_fresh_at(&self, now: SystemTime) -> bool {
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };
        // mtime ahead of the clock counts as age zero
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        age < CACHE_TTL
    }

    pub fn modified(&self) -> io::Result<SystemTime> {
        fs::metadata(&self.path)?.modified()
    }

    /// Load the snapshot. Empty cells read as absent values and rows
    /// without a ticker are skipped.
    pub fn read(&self) -> Result<Catalog, CacheError> {
        let file = File::open(&self.path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader.headers()?;
        if headers.iter().ne(HEADER.iter().copied()) {
            return Err(CacheError::Format(format!(
                "unexpected header: {:?}",
                headers.iter().collect::<Vec<_>>()
            )));
        }

        let mut symbols = Vec::new();
        for record in reader.records() {
            symbols.push(parse_record(&record?)?);
        }

        Ok(Catalog::from_symbols(symbols))
    }

    /// Replace the snapshot with `catalog`, creating parent directories
    /// as needed. The previous snapshot survives any failure.
    pub fn write(&self, catalog: &Catalog) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        let result = write_snapshot(&tmp_path, catalog)
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(CacheError::from));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CACHE_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_snapshot(path: &Path, catalog: &Catalog) -> Result<(), CacheError> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(HEADER)?;

    // Sorted for stable diffs between snapshots
    let mut symbols: Vec<&Symbol> = catalog.iter().collect();
    symbols.sort_unstable_by(|a, b| a.ticker.cmp(&b.ticker));

    for symbol in symbols {
        let lot_size = symbol.lot_size.to_string();
        let tick_size = symbol.tick_size.to_string();
        writer.write_record([
            symbol.ticker.as_str(),
            symbol.name.as_deref().unwrap_or(""),
            lot_size.as_str(),
            tick_size.as_str(),
            symbol.trading_status.map(|s| s.as_str()).unwrap_or(""),
        ])?;
    }

    let file = writer.into_inner().map_err(|e| CacheError::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(())
}

fn parse_record(record: &StringRecord) -> Result<Symbol, CacheError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let field = |idx: usize| record.get(idx).map(str::trim).filter(|v| !v.is_empty());

    let lot_size = match field(2) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|e| CacheError::Format(format!("line {}: lotSize {:?}: {}", line, raw, e)))?,
        None => 0,
    };
    let tick_size = match field(3) {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|e| CacheError::Format(format!("line {}: tickSize {:?}: {}", line, raw, e)))?,
        None => 0.0,
    };
    let trading_status = field(4)
        .map(str::parse::<TradingStatus>)
        .transpose()
        .map_err(|e| CacheError::Format(format!("line {}: {}", line, e)))?;

    Ok(Symbol {
        ticker: field(0).unwrap_or_default().to_string(),
        name: non_empty(record.get(1).map(str::to_string)),
        lot_size,
        tick_size,
        trading_status,
    })
}

/// Snapshot read/write errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid snapshot: {0}")]
    Format(String),
}
