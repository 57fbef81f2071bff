//! Warm-start persistence.
//!
//! Plain text, one line per day, whitespace-separated 0-based interior
//! node indices; the base at both route ends is implicit. An empty line
//! is an empty day. The file follows single-writer discipline: [`save`]
//! writes through a sibling temp file and a rename, but concurrent runs
//! sharing one path still race.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::ScheduleError;

/// Parses warm-start text into per-day interior sequences.
pub fn parse(text: &str) -> Result<Vec<Vec<usize>>, ScheduleError> {
    let mut routes = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let mut route = Vec::new();
        for token in line.split_whitespace() {
            let node = token
                .parse::<usize>()
                .map_err(|_| ScheduleError::WarmStartParse {
                    line: i + 1,
                    token: token.to_string(),
                })?;
            route.push(node);
        }
        routes.push(route);
    }
    Ok(routes)
}

/// Renders per-day interior sequences as warm-start text.
pub fn render(routes: &[Vec<usize>]) -> String {
    let mut out = String::new();
    for route in routes {
        let line: Vec<String> = route.iter().map(|n| n.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Loads a warm start; `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<Vec<Vec<usize>>>, ScheduleError> {
    match fs::read_to_string(path) {
        Ok(text) => parse(&text).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScheduleError::WarmStartIo {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists per-day sequences as the next run's seed.
pub fn save(path: &Path, routes: &[Vec<usize>]) -> Result<(), ScheduleError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, render(routes))
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| ScheduleError::SaveSolution {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let routes = vec![vec![3, 1, 4], vec![], vec![2]];
        let text = render(&routes);
        assert_eq!(text, "3 1 4\n\n2\n");
        assert_eq!(parse(&text).expect("parses"), routes);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse("1 2\n3 x\n").expect_err("bad token");
        assert!(matches!(
            err,
            ScheduleError::WarmStartParse { line: 2, .. }
        ));
    }

    #[test]
    fn test_parse_empty_text() {
        assert_eq!(parse("").expect("parses"), Vec::<Vec<usize>>::new());
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let path = std::env::temp_dir().join("weekplan_no_such_seed.txt");
        assert!(load(&path).expect("non-fatal").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("weekplan_seed_{}.txt", std::process::id()));
        let routes = vec![vec![5, 2], vec![7]];
        save(&path, &routes).expect("saves");
        let loaded = load(&path).expect("loads").expect("present");
        assert_eq!(loaded, routes);
        let _ = std::fs::remove_file(&path);
    }
}
