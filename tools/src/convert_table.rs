use anyhow::{bail, Context, Result};
use lovekey_core::{Lexicon, LexiconBuilder};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One table row: a word under a syllable, with an optional frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub syllable: String,
    pub word: String,
    pub freq: Option<u64>,
}

/// Parse one line of a table file. Blank lines and `#` comments yield `None`.
///
/// Columns are tab separated when the line has a tab, whitespace separated
/// otherwise: `syllable word [freq]`.
pub fn parse_line(line: &str) -> Result<Option<TableEntry>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let parts: Vec<&str> = if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };
    if parts.len() < 2 {
        bail!("expected `syllable word [freq]`, got {:?}", line);
    }
    let freq = match parts.get(2) {
        Some(f) => Some(f.parse::<u64>().with_context(|| format!("bad frequency {:?}", f))?),
        None => None,
    };
    Ok(Some(TableEntry {
        syllable: parts[0].to_lowercase(),
        word: parts[1].to_string(),
        freq,
    }))
}

/// Read table files and build a lexicon.
///
/// Within a syllable, words with a frequency come first (highest first);
/// ties and words without one keep file order.
pub fn build(inputs: &[PathBuf]) -> Result<Lexicon> {
    let mut grouped: BTreeMap<String, Vec<(Option<u64>, usize, String)>> = BTreeMap::new();
    let mut order = 0usize;

    for input in inputs {
        let reader = BufReader::new(
            File::open(input).with_context(|| format!("opening {}", input.display()))?,
        );
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let entry = parse_line(&line)
                .with_context(|| format!("{}:{}", input.display(), lineno + 1))?;
            if let Some(e) = entry {
                grouped
                    .entry(e.syllable)
                    .or_default()
                    .push((e.freq, order, e.word));
                order += 1;
            }
        }
    }

    let mut builder = LexiconBuilder::new();
    for (syllable, mut words) in grouped {
        words.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        builder
            .extend(&syllable, words.iter().map(|(_, _, w)| w.as_str()))
            .with_context(|| format!("syllable {:?}", syllable))?;
    }
    Ok(builder.build()?)
}

/// Build from `inputs` and write `lexicon.fst` + `lexicon.bincode` into `out_dir`.
pub fn run(inputs: &[PathBuf], out_dir: &Path) -> Result<Lexicon> {
    let lexicon = build(inputs)?;
    lexicon
        .save_dir(out_dir)
        .with_context(|| format!("writing {}", out_dir.display()))?;
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_line_formats() {
        assert_eq!(parse_line("  ").unwrap(), None);
        assert_eq!(parse_line("# comment").unwrap(), None);
        assert_eq!(
            parse_line("hao\t好\t120").unwrap(),
            Some(TableEntry {
                syllable: "hao".into(),
                word: "好".into(),
                freq: Some(120)
            })
        );
        assert_eq!(parse_line("Ni 你").unwrap().unwrap().syllable, "ni");
        assert!(parse_line("hao").is_err());
        assert!(parse_line("hao 好 lots").is_err());
    }

    #[test]
    fn frequency_orders_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "hao\t号\t10").unwrap();
        writeln!(f, "hao\t毫").unwrap();
        writeln!(f, "hao\t好\t300").unwrap();
        writeln!(f, "ai\t爱").unwrap();
        writeln!(f, "ai\t哎").unwrap();
        drop(f);

        let out = dir.path().join("out");
        run(&[path], &out).unwrap();
        let lx = Lexicon::load_dir(&out).unwrap();
        assert_eq!(lx.lookup("hao"), ["好", "号", "毫"]);
        assert_eq!(lx.lookup("ai"), ["爱", "哎"]);
    }

    #[test]
    fn bad_syllable_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");
        std::fs::write(&path, "ni3\t你\n").unwrap();
        let err = build(&[path]).unwrap_err();
        assert!(format!("{:#}", err).contains("ni3"));
    }
}
