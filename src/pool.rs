use std::{
    collections::HashMap,
    fs,
    io::Read,
    ops::Range,
    path::Path,
};

use csv::{
    ReaderBuilder,
    Trim,
};

use crate::core::{
    kana::normalize_reading,
    DrillError,
    PartOfSpeech,
    WordEntry,
};

const REQUIRED_COLUMNS: [&str; 5] = ["level", "pos", "jp_word", "reading", "meaning"];

/// The word pool for one proficiency level, loaded once per process and
/// immutable afterwards. Entries are stored sorted by part of speech so each
/// category is a contiguous slice.
#[derive(Debug)]
pub struct WordPool {
    level: String,
    entries: Vec<WordEntry>,
    spans: HashMap<PartOfSpeech, Range<usize>>,
}

impl WordPool {
    pub fn from_path(path: impl AsRef<Path>, level: &str) -> Result<Self, DrillError> {
        let content = fs::read_to_string(path)?;
        Self::from_table(&content, level)
    }

    pub fn from_reader(mut reader: impl Read, level: &str) -> Result<Self, DrillError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_table(&content, level)
    }

    /// Parse a word table. Tolerant of a UTF-8 BOM and of tab or comma
    /// delimiters; rows with an empty required field or an unknown part of
    /// speech are dropped.
    pub fn from_table(content: &str, level: &str) -> Result<Self, DrillError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let delimiter = sniff_delimiter(content);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns = resolve_columns(reader.headers()?)?;
        let wanted_level = level.trim();

        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            let field = |i: usize| record.get(columns[i]).unwrap_or("").trim();

            let row_level = field(0);
            let pos_tag = field(1);
            let surface = field(2);
            let reading = field(3);
            let meaning = field(4);

            if row_level.is_empty() || pos_tag.is_empty() || reading.is_empty() || meaning.is_empty()
            {
                skipped += 1;
                continue;
            }
            if !row_level.eq_ignore_ascii_case(wanted_level) {
                continue;
            }
            let Some(part_of_speech) = PartOfSpeech::parse(pos_tag) else {
                log::debug!("skipping row with unknown part of speech '{}'", pos_tag);
                skipped += 1;
                continue;
            };

            entries.push(WordEntry {
                level: wanted_level.to_string(),
                part_of_speech,
                surface_form: (!surface.is_empty()).then(|| surface.to_string()),
                reading: normalize_reading(reading),
                meaning: meaning.to_string(),
            });
        }

        if skipped > 0 {
            log::debug!("dropped {} unusable rows from word table", skipped);
        }
        if entries.is_empty() {
            return Err(DrillError::EmptyTable(wanted_level.to_string()));
        }

        // Group categories into contiguous slices, keeping table order inside
        // each category.
        let pos_rank =
            |p: PartOfSpeech| PartOfSpeech::ALL.iter().position(|q| *q == p).unwrap_or(0);
        entries.sort_by_key(|e| pos_rank(e.part_of_speech));

        let mut spans = HashMap::new();
        let mut start = 0;
        for pos in PartOfSpeech::ALL {
            let end = start + entries[start..].iter().take_while(|e| e.part_of_speech == pos).count();
            if end > start {
                spans.insert(pos, start..end);
            }
            start = end;
        }

        Ok(WordPool { level: wanted_level.to_string(), entries, spans })
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    /// Every entry at this level, across all categories. This is the wide
    /// pool meaning-mode distractors draw from.
    pub fn all_entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn category(&self, pos: PartOfSpeech) -> &[WordEntry] {
        self.spans.get(&pos).map(|span| &self.entries[span.clone()]).unwrap_or(&[])
    }

    /// The sub-pool of a category with a written form, used when a quiz
    /// displays or asks for kanji.
    pub fn with_surface(&self, pos: PartOfSpeech) -> Vec<&WordEntry> {
        self.category(pos).iter().filter(|e| e.surface_form.is_some()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A category that cannot host a minimum-size quiz is a word-table
    /// problem, not something mastery resets can fix.
    pub fn ensure_category_size(
        &self,
        pos: PartOfSpeech,
        required: usize,
    ) -> Result<(), DrillError> {
        let available = self.category(pos).len();
        if available < required {
            return Err(DrillError::PoolTooSmall { part_of_speech: pos, available, required });
        }
        Ok(())
    }
}

fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

/// Map required column names to record indices, case-insensitively.
fn resolve_columns(headers: &csv::StringRecord) -> Result<[usize; 5], DrillError> {
    let mut columns = [0usize; 5];
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        columns[slot] = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| DrillError::MissingColumn(name.to_string()))?;
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
level,pos,jp_word,reading,meaning
N4,i-adjective,高い,たかい,expensive
N4,i-adjective,,やすい,cheap
N4,na-adjective,静か,しずか,quiet
N4,verb,走る,はしる,to run
N5,verb,見る,みる,to see
N4,adverb,早く,はやく,quickly
N4,verb,食べる,,to eat
";

    #[test]
    fn loads_and_partitions_by_part_of_speech() {
        let pool = WordPool::from_table(TABLE, "N4").unwrap();
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.category(PartOfSpeech::IAdjective).len(), 2);
        assert_eq!(pool.category(PartOfSpeech::NaAdjective).len(), 1);
        assert_eq!(pool.category(PartOfSpeech::Verb).len(), 1);
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let pool = WordPool::from_table(TABLE, "N4").unwrap();
        // 食べる has no reading, 早く has an unknown pos, 見る is N5.
        assert!(pool.all_entries().iter().all(|e| !e.reading.is_empty()));
        assert!(!pool.all_entries().iter().any(|e| e.meaning == "to eat"));
        assert!(!pool.all_entries().iter().any(|e| e.meaning == "quickly"));
        assert!(!pool.all_entries().iter().any(|e| e.level == "N5"));
    }

    #[test]
    fn empty_surface_form_falls_back_to_reading() {
        let pool = WordPool::from_table(TABLE, "N4").unwrap();
        let yasui = pool
            .all_entries()
            .iter()
            .find(|e| e.reading == "やすい")
            .unwrap();
        assert_eq!(yasui.surface_form, None);
        assert_eq!(yasui.display_form(), "やすい");
        assert_eq!(yasui.key(), "やすい");
    }

    #[test]
    fn tolerates_bom_and_tab_delimiter() {
        let table = "\u{feff}level\tpos\tjp_word\treading\tmeaning\n\
                     N4\tverb\t走る\tはしる\tto run\n";
        let pool = WordPool::from_table(table, "N4").unwrap();
        assert_eq!(pool.category(PartOfSpeech::Verb).len(), 1);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let table = "Level,POS,jp_word,Reading,Meaning\nN4,verb,走る,はしる,to run\n";
        assert!(WordPool::from_table(table, "N4").is_ok());
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = "level,pos,jp_word,reading\nN4,verb,走る,はしる\n";
        match WordPool::from_table(table, "N4") {
            Err(DrillError::MissingColumn(name)) => assert_eq!(name, "meaning"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn no_rows_at_level_is_an_empty_table_error() {
        assert!(matches!(
            WordPool::from_table(TABLE, "N1"),
            Err(DrillError::EmptyTable(level)) if level == "N1"
        ));
    }

    #[test]
    fn katakana_reading_is_normalized() {
        let table = "level,pos,jp_word,reading,meaning\nN4,na-adjective,綺麗,キレイ,pretty\n";
        let pool = WordPool::from_table(table, "N4").unwrap();
        assert_eq!(pool.category(PartOfSpeech::NaAdjective)[0].reading, "きれい");
    }

    #[test]
    fn undersized_category_is_a_fatal_config_error() {
        let pool = WordPool::from_table(TABLE, "N4").unwrap();
        let err = pool.ensure_category_size(PartOfSpeech::Verb, 10).unwrap_err();
        assert!(err.is_fatal_config());
        assert!(matches!(
            err,
            DrillError::PoolTooSmall { available: 1, required: 10, .. }
        ));
    }
}
