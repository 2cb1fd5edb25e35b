//! Built-in pinyin table.
//!
//! A small table of everyday single characters, enough to type with when no
//! compiled lexicon directory is available. Words are listed most frequent
//! first; that order is the candidate order.

use std::path::Path;

use lovekey_core::{lexicon, Lexicon, LexiconBuilder, Result};
use tracing::{debug, info};

/// syllable -> words, in display order.
pub const BASIC_TABLE: &[(&str, &[&str])] = &[
    ("a", &["啊", "阿", "呵"]),
    ("ai", &["爱", "哎", "唉", "矮"]),
    ("an", &["安", "按", "暗", "岸"]),
    ("ba", &["吧", "把", "爸", "八"]),
    ("bai", &["白", "百", "拜", "败"]),
    ("ban", &["半", "办", "班", "般"]),
    ("bei", &["被", "北", "背", "杯"]),
    ("bi", &["比", "笔", "必", "闭"]),
    ("bu", &["不", "步", "部", "布"]),
    ("da", &["大", "打", "达", "答"]),
    ("de", &["的", "得", "地", "德"]),
    ("dui", &["对", "队", "堆"]),
    ("duo", &["多", "朵", "躲"]),
    ("en", &["嗯", "恩"]),
    ("er", &["二", "耳", "而"]),
    ("ge", &["个", "哥", "歌"]),
    ("guo", &["过", "国", "果"]),
    ("hao", &["好", "号", "毫"]),
    ("he", &["和", "喝", "河"]),
    ("hen", &["很", "恨", "狠"]),
    ("hui", &["会", "回", "灰"]),
    ("ji", &["几", "机", "鸡"]),
    ("jiu", &["就", "九", "酒"]),
];

/// Build the lexicon for `BASIC_TABLE`.
pub fn builtin_lexicon() -> Result<Lexicon> {
    let mut builder = LexiconBuilder::new();
    for (syllable, words) in BASIC_TABLE {
        builder.extend(syllable, words.iter().copied())?;
    }
    builder.build()
}

/// Load a compiled lexicon from `dir` when it holds one, the built-in table
/// otherwise.
pub fn load_lexicon(dir: Option<&Path>) -> Result<Lexicon> {
    match dir {
        Some(dir) if dir.join(lexicon::FST_FILE).exists() => {
            let lx = Lexicon::load_dir(dir)?;
            info!(dir = %dir.display(), syllables = lx.len(), "loaded lexicon");
            Ok(lx)
        }
        Some(dir) => {
            debug!(dir = %dir.display(), "no compiled lexicon, using built-in table");
            builtin_lexicon()
        }
        None => builtin_lexicon(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_complete() {
        let lx = builtin_lexicon().unwrap();
        assert_eq!(lx.len(), BASIC_TABLE.len());
        assert_eq!(lx.lookup("ai"), ["爱", "哎", "唉", "矮"]);
        assert_eq!(lx.lookup("jiu"), ["就", "九", "酒"]);
    }

    #[test]
    fn missing_dir_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let lx = load_lexicon(Some(dir.path())).unwrap();
        assert!(lx.contains("hao"));
    }

    #[test]
    fn compiled_dir_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = LexiconBuilder::new();
        b.insert("xiang", "想").unwrap();
        b.build().unwrap().save_dir(dir.path()).unwrap();

        let lx = load_lexicon(Some(dir.path())).unwrap();
        assert!(lx.contains("xiang"));
        assert!(!lx.contains("hao"));
    }
}
