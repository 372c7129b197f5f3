use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::LoadError;

const DATETIME_FORMATS: [&str; 8] = [
    "%Y%m%d%H%M%S",
    "%Y%m%d%H%M%S%.f",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%d%H%M",
    "%Y%m%dT%H%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// One per-acquisition output directory and the time encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionDir {
    pub path: PathBuf,
    pub acquired: NaiveDateTime,
}

impl AcquisitionDir {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Expands every glob pattern, keeps the directories and orders them by
/// acquisition time. A single unparsable name fails the whole listing.
pub fn acquisition_dirs(patterns: &[String]) -> Result<Vec<AcquisitionDir>, LoadError> {
    let mut dirs = Vec::new();

    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            let path = entry?;
            if !path.is_dir() {
                tracing::debug!("Skipping {}: not a directory", path.display());
                continue;
            }
            let acquired = acquisition_time(&path)?;
            dirs.push(AcquisitionDir { path, acquired });
        }
    }

    // Stable, so equal times keep the pattern order.
    dirs.sort_by_key(|dir| dir.acquired);

    Ok(dirs)
}

/// Joins every `_`-separated segment after the first one and parses the result,
/// e.g. `CSK_20210101_000000` -> `2021-01-01 00:00:00`.
pub fn acquisition_time(dir: &Path) -> Result<NaiveDateTime, LoadError> {
    let name = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp: String = name.split('_').skip(1).collect();

    parse_stamp(&stamp).ok_or_else(|| LoadError::AcquisitionTime {
        dir: dir.to_path_buf(),
        stamp,
    })
}

fn parse_stamp(stamp: &str) -> Option<NaiveDateTime> {
    let stamp = stamp.trim().trim_end_matches(['Z', 'z']);
    if stamp.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(stamp, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(stamp, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Regular files directly inside `dir` whose name matches `pattern`, sorted by
/// name. A missing directory has no files.
pub fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = glob::Pattern::new(pattern)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file()
            && let Some(file_name) = entry.file_name().to_str()
            && pattern.matches(file_name)
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// First match of [`find_files`], if any.
pub fn find_file(dir: &Path, pattern: &str) -> Result<Option<PathBuf>, LoadError> {
    Ok(find_files(dir, pattern)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_acquisition_time() {
        let time = acquisition_time(Path::new("/data/CSK_20210101_000000")).unwrap();
        assert_eq!(time, datetime(2021, 1, 1, 0, 0, 0));

        let time = acquisition_time(Path::new("/data/RS2_20210315_093012")).unwrap();
        assert_eq!(time, datetime(2021, 3, 15, 9, 30, 12));

        let time = acquisition_time(Path::new("/data/S1A_20210315T093012")).unwrap();
        assert_eq!(time, datetime(2021, 3, 15, 9, 30, 12));

        let time = acquisition_time(Path::new("/data/SAT_20210704")).unwrap();
        assert_eq!(time, datetime(2021, 7, 4, 0, 0, 0));
    }

    #[test]
    fn test_acquisition_time_rejects_malformed_names() {
        for name in ["/data/CSK", "/data/CSK_", "/data/CSK_notadate", "/data/20210101"] {
            let err = acquisition_time(Path::new(name)).unwrap_err();
            assert!(matches!(err, LoadError::AcquisitionTime { .. }), "{}", name);
        }
    }

    #[test]
    fn test_dirs_are_sorted_chronologically_across_roots() {
        let root = tempdir().unwrap();
        // Lexical order of the roots is the opposite of the acquisition order.
        let paths = [
            "a_radarsat/RS2_20210301_120000",
            "a_radarsat/RS2_20210101_080000",
            "b_cosmo/CSK_20210215_000000",
            "b_cosmo/CSK_20201231_235959",
        ];
        for path in paths {
            fs::create_dir_all(root.path().join(path)).unwrap();
        }
        // Plain files matching the pattern are not acquisitions.
        fs::write(root.path().join("a_radarsat/notes.txt"), "x").unwrap();

        let patterns = vec![
            format!("{}/a_radarsat/*", root.path().display()),
            format!("{}/b_cosmo/*", root.path().display()),
        ];
        let dirs = acquisition_dirs(&patterns).unwrap();

        let names: Vec<String> = dirs.iter().map(|dir| dir.name()).collect();
        assert_eq!(
            names,
            vec![
                "CSK_20201231_235959",
                "RS2_20210101_080000",
                "CSK_20210215_000000",
                "RS2_20210301_120000",
            ]
        );
        assert!(dirs.windows(2).all(|pair| pair[0].acquired <= pair[1].acquired));
    }

    #[test]
    fn test_malformed_dir_aborts_listing() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("CSK_20210101_000000")).unwrap();
        fs::create_dir_all(root.path().join("scratch")).unwrap();

        let patterns = vec![format!("{}/*", root.path().display())];
        let err = acquisition_dirs(&patterns).unwrap_err();

        assert!(matches!(err, LoadError::AcquisitionTime { .. }));
    }

    #[test]
    fn test_no_matches() {
        let root = tempdir().unwrap();
        let patterns = vec![format!("{}/2021*/*", root.path().display())];

        assert!(acquisition_dirs(&patterns).unwrap().is_empty());
    }

    #[test]
    fn test_find_files() {
        let dir = tempdir().unwrap();
        for name in [
            "CSK_20210101_OIL.shp",
            "CSK_20210101_OIL.dbf",
            "CSK_20210101_SHIP.shp",
            "b_geo5.tif",
            "a_geo5.tif",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested_OIL.shp")).unwrap();

        let oils = find_files(dir.path(), "*OIL.shp").unwrap();
        assert_eq!(oils, vec![dir.path().join("CSK_20210101_OIL.shp")]);

        let scenes = find_files(dir.path(), "*geo5.tif").unwrap();
        assert_eq!(
            scenes,
            vec![dir.path().join("a_geo5.tif"), dir.path().join("b_geo5.tif")]
        );

        assert_eq!(find_file(dir.path(), "*frame.shp").unwrap(), None);
    }

    #[test]
    fn test_find_files_in_missing_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("frames");

        assert!(find_files(&missing, "*frame.shp").unwrap().is_empty());
    }
}
