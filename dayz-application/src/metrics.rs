use std::sync::atomic::{AtomicU64, Ordering};

use dayz_domain::ParseStats;

#[derive(Debug, Default)]
pub struct Metrics {
    files_parsed: AtomicU64,
    lines_read: AtomicU64,
    events_parsed: AtomicU64,
    lines_skipped: AtomicU64,
    suspicious_players: AtomicU64,
    files_downloaded: AtomicU64,
    download_errors: AtomicU64,
}

impl Metrics {
    pub fn record_parse(&self, stats: &ParseStats) {
        self.files_parsed.fetch_add(stats.files as u64, Ordering::Relaxed);
        self.lines_read.fetch_add(stats.lines as u64, Ordering::Relaxed);
        self.events_parsed.fetch_add(stats.events as u64, Ordering::Relaxed);
        self.lines_skipped.fetch_add(stats.skipped as u64, Ordering::Relaxed);
    }

    pub fn record_suspicions(&self, count: usize) {
        self.suspicious_players
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_download(&self) {
        self.files_downloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_download_error(&self) {
        self.download_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_summary(&self) -> String {
        format!(
            "files_parsed={} lines_read={} events_parsed={} lines_skipped={} suspicious_players={} files_downloaded={} download_errors={}",
            self.files_parsed.load(Ordering::Relaxed),
            self.lines_read.load(Ordering::Relaxed),
            self.events_parsed.load(Ordering::Relaxed),
            self.lines_skipped.load(Ordering::Relaxed),
            self.suspicious_players.load(Ordering::Relaxed),
            self.files_downloaded.load(Ordering::Relaxed),
            self.download_errors.load(Ordering::Relaxed),
        )
    }
}
