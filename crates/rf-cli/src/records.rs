use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::Context;

use rf_core::HttpRequest;

/// Call `f` with every record of a JSON-lines input (a file, or stdin
/// when `input` is `None`). Blank lines are skipped.
pub fn for_each_record<F>(input: Option<&str>, f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &HttpRequest) -> anyhow::Result<()>,
{
    match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to read '{}'", path))?;
            read_records(BufReader::new(file), f)
        }
        None => read_records(io::stdin().lock(), f),
    }
}

pub fn read_records<R, F>(reader: R, mut f: F) -> anyhow::Result<()>
where
    R: BufRead,
    F: FnMut(&str, &HttpRequest) -> anyhow::Result<()>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: HttpRequest = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid record on line {}", line_no))?;
        f(trimmed, &record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rf_query::Criteria;

    use super::*;

    const INPUT: &str = r#"{"method":"GET","scheme":"https","host":"api.example.com","path":"/v1/users"}

{"method":"POST","scheme":"http","host":"example.org","path":"/login","response":{"status_code":302}}
"#;

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let mut hosts = Vec::new();
        read_records(INPUT.as_bytes(), |_, record| {
            hosts.push(record.host.clone());
            Ok(())
        })
        .expect("input should decode");
        assert_eq!(hosts, vec!["api.example.com", "example.org"]);
    }

    #[test]
    fn filters_by_query() {
        let criteria = Criteria::new("method is post AND status == 302");
        let mut lines = Vec::new();
        read_records(INPUT.as_bytes(), |line, record| {
            if criteria.matches(record) {
                lines.push(line.to_string());
            }
            Ok(())
        })
        .expect("input should decode");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("example.org"));
    }

    #[test]
    fn malformed_line_names_its_number() {
        let input = "{\"host\":\"a\"}\nnot json\n";
        let err = read_records(input.as_bytes(), |_, _| Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "Invalid record on line 2");
    }
}
