//! Keyword-based classification of free-text event names into the
//! canonical tournament set.

use std::fmt;

/// Canonical tournament identifiers. The display string is the Japanese
/// name written into the `棋戦` header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tournament {
    Ryuo,
    Meijin,
    Eio,
    Oi,
    Oza,
    Kio,
    Osho,
    Kisei,
    AsahiCup,
    Ginga,
    NhkCup,
    JtCup,
    Shinjin,
    KakogawaSeiryu,
    Hakurei,
    Seirei,
    MynaviOpen,
    JoryuOza,
    JoryuMeijin,
    JoryuOi,
    JoryuOsho,
    KurashikiToka,
}

impl Tournament {
    pub fn as_str(self) -> &'static str {
        match self {
            Tournament::Ryuo => "竜王戦",
            Tournament::Meijin => "名人戦",
            Tournament::Eio => "叡王戦",
            Tournament::Oi => "王位戦",
            Tournament::Oza => "王座戦",
            Tournament::Kio => "棋王戦",
            Tournament::Osho => "王将戦",
            Tournament::Kisei => "棋聖戦",
            Tournament::AsahiCup => "朝日杯将棋オープン戦",
            Tournament::Ginga => "銀河戦",
            Tournament::NhkCup => "NHK杯",
            Tournament::JtCup => "将棋日本シリーズ",
            Tournament::Shinjin => "新人王戦",
            Tournament::KakogawaSeiryu => "加古川青流戦",
            Tournament::Hakurei => "白玲戦",
            Tournament::Seirei => "清麗戦",
            Tournament::MynaviOpen => "マイナビ女子オープン",
            Tournament::JoryuOza => "女流王座戦",
            Tournament::JoryuMeijin => "女流名人戦",
            Tournament::JoryuOi => "女流王位戦",
            Tournament::JoryuOsho => "女流王将戦",
            Tournament::KurashikiToka => "倉敷藤花戦",
        }
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority-ordered keyword table. First match wins, so the women's title
/// entries must precede the open titles they contain as substrings
/// (女流王座戦 would otherwise match 王座戦), and 順位戦 games classify
/// under 名人戦.
const KEYWORDS: &[(Tournament, &[&str])] = &[
    (Tournament::Hakurei, &["白玲"]),
    (Tournament::Seirei, &["清麗"]),
    (Tournament::MynaviOpen, &["マイナビ"]),
    (Tournament::JoryuOza, &["女流王座"]),
    (Tournament::JoryuMeijin, &["女流名人"]),
    (Tournament::JoryuOi, &["女流王位"]),
    (Tournament::JoryuOsho, &["女流王将"]),
    (Tournament::KurashikiToka, &["倉敷藤花"]),
    (Tournament::Ryuo, &["竜王戦"]),
    (Tournament::Meijin, &["名人戦", "順位戦"]),
    (Tournament::Eio, &["叡王戦"]),
    (Tournament::Oi, &["王位戦"]),
    (Tournament::Oza, &["王座戦"]),
    (Tournament::Kio, &["棋王戦"]),
    (Tournament::Osho, &["王将戦"]),
    (Tournament::Kisei, &["棋聖戦"]),
    (Tournament::AsahiCup, &["朝日杯"]),
    (Tournament::Ginga, &["銀河戦"]),
    (Tournament::NhkCup, &["NHK杯"]),
    (Tournament::JtCup, &["JT杯", "日本シリーズ"]),
    (Tournament::Shinjin, &["新人王戦"]),
    (Tournament::KakogawaSeiryu, &["加古川青流"]),
];

/// Map a free-text event name to a canonical tournament. Returns `None`
/// when no keyword matches; callers must tolerate the miss (the field is
/// simply omitted from metadata).
pub fn classify(free_text: &str) -> Option<Tournament> {
    KEYWORDS
        .iter()
        .find(|(_, keys)| keys.iter().any(|k| free_text.contains(k)))
        .map(|(t, _)| *t)
}
