use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{info, warn};

use dayz_domain::{DownloadRequest, DownloadSummary, LogKind, RemoteLogFile};

use crate::{AppError, AppState};

pub async fn download_logs(
    state: &AppState,
    request: DownloadRequest,
) -> Result<DownloadSummary, AppError> {
    let range = DateRange::parse(request.start_date.as_deref(), request.end_date.as_deref())?;
    let directory = request
        .remote_dir
        .clone()
        .unwrap_or_else(|| state.config.nitrado.default_log_directory());
    let output_dir = request
        .output_dir
        .clone()
        .unwrap_or_else(|| state.config.log_dir.clone());

    info!("listing remote log files in {}", directory);
    let files = state.remote.list_files(&directory).await?;
    let selected = select_files(
        &files,
        &request,
        range.as_ref(),
        &state.config.nitrado.default_patterns,
    )?;

    let mut summary = DownloadSummary {
        listed: files.len(),
        matched: selected.len(),
        output_dir: output_dir.clone(),
        ..DownloadSummary::default()
    };
    if selected.is_empty() {
        warn!("no files matched the specified criteria");
        return Ok(summary);
    }

    for file in selected {
        info!(
            "downloading {} (modified {})",
            file.name,
            file.modified_at
                .map(|value| value.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        let content = match state.remote.download_file(&file.path).await {
            Ok(content) => content,
            Err(err) => {
                warn!("download failed for {}: {:#}", file.name, err);
                state.metrics.record_download_error();
                summary.failed += 1;
                continue;
            }
        };
        match state.log_repo.save_raw(&output_dir, &file.name, &content).await {
            Ok(path) => {
                info!("saved {}", path);
                state.metrics.record_download();
                summary.downloaded += 1;
            }
            Err(err) => {
                warn!("failed to save {}: {:#}", file.name, err);
                state.metrics.record_download_error();
                summary.failed += 1;
            }
        }
    }

    info!(
        "downloaded {} of {} files to {}",
        summary.downloaded, summary.matched, summary.output_dir
    );
    Ok(summary)
}

/// Inclusive range of whole days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    /// Parses `D.M.YYYY` bounds; `None` when neither bound is given.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, AppError> {
        let start = non_blank(start);
        let end = non_blank(end);
        if start.is_none() && end.is_none() {
            return Ok(None);
        }
        let start = start
            .map(|value| day_bound(value, NaiveTime::from_hms_milli_opt(0, 0, 0, 0)))
            .transpose()?;
        let end = end
            .map(|value| day_bound(value, NaiveTime::from_hms_milli_opt(23, 59, 59, 999)))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AppError::InvalidInput(
                    "start date must not be after end date".to_string(),
                ));
            }
        }
        Ok(Some(Self { start, end }))
    }

    pub fn contains(&self, value: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| value >= start) && self.end.map_or(true, |end| value <= end)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn day_bound(value: &str, time: Option<NaiveTime>) -> Result<NaiveDateTime, AppError> {
    let day = NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y").map_err(|err| {
        AppError::InvalidInput(format!(
            "invalid date {} (expected D.M.YYYY, e.g. 01.06.2023): {}",
            value, err
        ))
    })?;
    let time = time.ok_or_else(|| AppError::InvalidInput(format!("invalid date {}", value)))?;
    Ok(day.and_time(time))
}

/// Builds a case-insensitive matcher over file names.
pub fn name_matcher(patterns: &[String]) -> Result<GlobSet, AppError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| AppError::InvalidInput(format!("invalid pattern {}: {}", pattern, err)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| AppError::InvalidInput(format!("invalid patterns: {}", err)))
}

/// Applies the download filters. With no date range and no patterns every
/// ADM/RPT file is selected, unless `latest_default` is off.
pub fn select_files(
    files: &[RemoteLogFile],
    request: &DownloadRequest,
    range: Option<&DateRange>,
    default_patterns: &[String],
) -> Result<Vec<RemoteLogFile>, AppError> {
    let is_log = |file: &&RemoteLogFile| LogKind::from_file_name(&file.name) != LogKind::Other;
    if request.download_all {
        return Ok(files.iter().filter(is_log).cloned().collect());
    }

    let patterns: &[String] = if request.patterns.is_empty() {
        default_patterns
    } else {
        &request.patterns
    };

    if range.is_none() && patterns.is_empty() {
        if !request.latest_default {
            return Ok(Vec::new());
        }
        return Ok(files.iter().filter(is_log).cloned().collect());
    }

    let matcher = name_matcher(patterns)?;
    Ok(files
        .iter()
        .filter(|file| match range {
            Some(range) => file.modified_at.map_or(false, |value| range.contains(value)),
            None => true,
        })
        .filter(|file| patterns.is_empty() || matcher.is_match(&file.name))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{state_with, FakeLogs};

    fn remote(name: &str, day: u32) -> RemoteLogFile {
        RemoteLogFile {
            name: name.to_string(),
            path: format!("/games/1/ftproot/dayzxb/config/{}", name),
            size: Some(1024),
            modified_at: NaiveDate::from_ymd_opt(2023, 6, day).and_then(|d| d.and_hms_opt(18, 30, 0)),
        }
    }

    fn listing() -> Vec<RemoteLogFile> {
        vec![
            remote("DayZServer_x1_2023_06_01.ADM", 1),
            remote("DayZServer_x1_2023_06_01.RPT", 1),
            remote("DayZServer_x1_2023_06_15.ADM", 15),
            remote("DayZServer_x1_2023_06_30.RPT", 30),
            remote("serverDZ.cfg", 30),
        ]
    }

    fn names(files: &[RemoteLogFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn no_filters_selects_every_log_file() {
        let selected = select_files(&listing(), &DownloadRequest::default(), None, &[]).expect("select");
        assert_eq!(selected.len(), 4);
        assert!(!names(&selected).contains(&"serverDZ.cfg"));
    }

    #[test]
    fn date_range_is_inclusive_of_whole_days() {
        let range = DateRange::parse(Some("15.06.2023"), Some("30.6.2023"))
            .expect("parse")
            .expect("range");
        let selected = select_files(&listing(), &DownloadRequest::default(), Some(&range), &[])
            .expect("select");
        assert_eq!(
            names(&selected),
            vec!["DayZServer_x1_2023_06_15.ADM", "DayZServer_x1_2023_06_30.RPT", "serverDZ.cfg"]
        );
    }

    #[test]
    fn patterns_are_case_insensitive_and_fall_back_to_defaults() {
        let request = DownloadRequest {
            patterns: vec!["*.adm".to_string()],
            ..DownloadRequest::default()
        };
        let selected = select_files(&listing(), &request, None, &[]).expect("select");
        assert_eq!(selected.len(), 2);

        let defaults = vec!["*_06_30.*".to_string()];
        let selected = select_files(&listing(), &DownloadRequest::default(), None, &defaults)
            .expect("select");
        assert_eq!(names(&selected), vec!["DayZServer_x1_2023_06_30.RPT"]);
    }

    #[test]
    fn download_all_ignores_other_filters() {
        let request = DownloadRequest {
            download_all: true,
            patterns: vec!["nothing".to_string()],
            ..DownloadRequest::default()
        };
        assert_eq!(
            select_files(&listing(), &request, None, &[]).expect("select").len(),
            4
        );
    }

    #[test]
    fn patterns_support_character_classes() {
        let request = DownloadRequest {
            patterns: vec!["*_06_0[16].adm".to_string()],
            ..DownloadRequest::default()
        };
        let selected = select_files(&listing(), &request, None, &[]).expect("select");
        assert_eq!(names(&selected), vec!["DayZServer_x1_2023_06_01.ADM"]);

        let broken = DownloadRequest {
            patterns: vec!["[".to_string()],
            ..DownloadRequest::default()
        };
        let err = select_files(&listing(), &broken, None, &[]).expect_err("invalid glob");
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn no_filters_without_latest_default_selects_nothing() {
        let request = DownloadRequest {
            latest_default: false,
            ..DownloadRequest::default()
        };
        assert!(select_files(&listing(), &request, None, &[]).expect("select").is_empty());

        let with_pattern = DownloadRequest {
            latest_default: false,
            patterns: vec!["*.RPT".to_string()],
            ..DownloadRequest::default()
        };
        assert_eq!(
            select_files(&listing(), &with_pattern, None, &[]).expect("select").len(),
            2
        );
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(DateRange::parse(Some("2023-06-01"), None).is_err());
        assert!(DateRange::parse(Some("30.06.2023"), Some("01.06.2023")).is_err());
        assert!(DateRange::parse(Some("  "), None).expect("blank").is_none());
    }

    #[tokio::test]
    async fn download_saves_selected_files_and_counts_failures() {
        let mut files = listing();
        files.push(remote("broken.ADM", 2));
        let (state, handles) = state_with(FakeLogs::default(), files);
        let request = DownloadRequest {
            patterns: vec!["*.ADM".to_string()],
            ..DownloadRequest::default()
        };

        let summary = download_logs(&state, request).await.expect("download");
        assert_eq!(summary.listed, 6);
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.output_dir, "logs");

        let saved = handles.saved.lock().expect("lock").clone();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].0, "logs");
        assert_eq!(saved[0].1, "DayZServer_x1_2023_06_01.ADM");
        assert_eq!(handles.listed_dirs.lock().expect("lock")[0], "games/1/ftproot/dayzxb/config/");
    }
}
