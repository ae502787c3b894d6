// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads prepared examples from a JSON-lines file, one example
// per line:
//
//   {"input_ids":[101,..],"input_mask":[1,..],"segment_ids":[0,..],
//    "label":1,
//    "align_a":[3,null,..],"graph_a":{"num_nodes":4,"src":[..],"dst":[..]},
//    "align_b":[..],       "graph_b":{..},
//    "graph_c":{..}}
//
// Every record must carry exactly the nine example fields;
// a missing or unknown field rejects the whole corpus with the
// offending line number. Blank lines are skipped.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::example::GraphExample;
use crate::domain::traits::CorpusSource;

/// Reads a `.jsonl` corpus of prepared graph QA examples.
pub struct JsonlCorpusLoader {
    path: PathBuf,
}

impl JsonlCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for JsonlCorpusLoader {
    fn load_all(&self) -> Result<Vec<GraphExample>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open corpus '{}'", self.path.display()))?;

        let examples = parse_lines(BufReader::new(file), &self.path)?;
        tracing::info!(
            "Loaded {} examples from '{}'",
            examples.len(),
            self.path.display()
        );
        Ok(examples)
    }
}

fn parse_lines(reader: impl BufRead, path: &Path) -> Result<Vec<GraphExample>> {
    let mut examples = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Cannot read '{}'", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let example: GraphExample = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid example record", path.display(), i + 1))?;
        examples.push(example);
    }
    Ok(examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RECORD: &str = r#"{"input_ids":[1,2,3],"input_mask":[1,1,0],"segment_ids":[0,1,1],"label":1,"align_a":[0,null],"graph_a":{"num_nodes":2,"src":[0],"dst":[1]},"align_b":[2],"graph_b":{"num_nodes":1},"graph_c":{"num_nodes":3,"src":[0,1],"dst":[1,2]}}"#;

    fn write_corpus(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_loads_records_and_skips_blank_lines() {
        let f        = write_corpus(&format!("{RECORD}\n\n{RECORD}\n"));
        let examples = JsonlCorpusLoader::new(f.path()).load_all().unwrap();

        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].seq_len(), 3);
        assert_eq!(examples[0].graph_c.num_edges(), 2);
        assert_eq!(examples[1].align_a.position(1), None);
    }

    #[test]
    fn test_missing_field_names_line() {
        let broken = RECORD.replace(r#","graph_c":{"num_nodes":3,"src":[0,1],"dst":[1,2]}"#, "");
        let f      = write_corpus(&format!("{RECORD}\n{broken}\n"));

        let err = JsonlCorpusLoader::new(f.path()).load_all().unwrap_err();
        assert!(format!("{err:#}").contains(":2: invalid example record"));
    }

    #[test]
    fn test_extra_field_rejected() {
        let extra = RECORD.replacen('{', r#"{"graph_d":{"num_nodes":1},"#, 1);
        let f     = write_corpus(&extra);
        assert!(JsonlCorpusLoader::new(f.path()).load_all().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = JsonlCorpusLoader::new("/nonexistent/corpus.jsonl").load_all().unwrap_err();
        assert!(err.to_string().contains("Cannot open corpus"));
    }
}
