//! Fixed-vocabulary theme and plot tagging.
//!
//! Each language has twelve theme groups and twelve plot groups. A text
//! registers every group word that appears in it as a whole word, so two
//! synonyms from the same group are two separate matches.

use std::collections::{BTreeSet, HashSet};

use crate::text::language::Language;
use crate::text::word_tokens;

#[derive(Debug, Clone, Copy)]
pub struct TagGroup {
    pub tag: &'static str,
    pub words: &'static [&'static str],
}

const fn group(tag: &'static str, words: &'static [&'static str]) -> TagGroup {
    TagGroup { tag, words }
}

/// Matched group words (not tags), sorted.
pub fn extract_themes(text: &str, language: Language) -> BTreeSet<String> {
    matched_words(text, theme_table(language))
}

pub fn extract_plot_elements(text: &str, language: Language) -> BTreeSet<String> {
    matched_words(text, plot_table(language))
}

/// Tags of the theme groups present in `text`.
pub fn theme_tags(text: &str, language: Language) -> BTreeSet<&'static str> {
    matched_tags(text, theme_table(language))
}

pub fn plot_tags(text: &str, language: Language) -> BTreeSet<&'static str> {
    matched_tags(text, plot_table(language))
}

/// Unsupported languages fall back to English.
pub fn theme_table(language: Language) -> &'static [TagGroup] {
    match language {
        Language::Fr => FR_THEMES,
        Language::Es => ES_THEMES,
        Language::De => DE_THEMES,
        Language::En | Language::Unknown => EN_THEMES,
    }
}

pub fn plot_table(language: Language) -> &'static [TagGroup] {
    match language {
        Language::Fr => FR_PLOTS,
        Language::Es => ES_PLOTS,
        Language::De => DE_PLOTS,
        Language::En | Language::Unknown => EN_PLOTS,
    }
}

fn matched_words(text: &str, table: &[TagGroup]) -> BTreeSet<String> {
    let words: HashSet<String> = word_tokens(text).collect();
    table
        .iter()
        .flat_map(|g| g.words.iter())
        .filter(|w| words.contains(**w))
        .map(|w| (*w).to_string())
        .collect()
}

fn matched_tags(text: &str, table: &[TagGroup]) -> BTreeSet<&'static str> {
    let words: HashSet<String> = word_tokens(text).collect();
    table
        .iter()
        .filter(|g| g.words.iter().any(|w| words.contains(*w)))
        .map(|g| g.tag)
        .collect()
}

// ─── English ───────────────────────────────────────────────

static EN_THEMES: &[TagGroup] = &[
    group("love", &["love", "romance", "relationship", "family", "friendship", "loyalty", "betrayal"]),
    group("war", &["war", "battle", "conflict", "fight", "struggle", "violence", "peace"]),
    group("crime", &["mystery", "detective", "crime", "murder", "investigation", "thriller"]),
    group("fantasy", &["magic", "fantasy", "wizard", "dragon", "sorcery", "myth"]),
    group("science", &["science", "technology", "space", "future", "robot", "alien", "time"]),
    group("horror", &["horror", "fear", "terror", "ghost", "monster", "supernatural", "dark"]),
    group("power", &["power", "politics", "king", "queen", "empire", "throne", "rule"]),
    group("mortality", &["death", "life", "survival", "hope", "loss", "grief", "rebirth"]),
    group("identity", &["identity", "self", "memory", "past", "secret", "truth", "lie"]),
    group("society", &["society", "culture", "class", "revolution", "rebellion", "freedom"]),
    group("nature", &["nature", "world", "earth", "environment", "animal", "wild"]),
    group("faith", &["religion", "god", "faith", "belief", "spiritual", "divine"]),
];

static EN_PLOTS: &[TagGroup] = &[
    group("journey", &["journey", "quest", "mission", "adventure", "voyage", "expedition"]),
    group("discovery", &["discovery", "revelation", "secret", "mystery", "truth"]),
    group("conflict", &["conflict", "struggle", "fight", "battle", "war", "confrontation"]),
    group("rescue", &["escape", "rescue", "save", "protect", "defend"]),
    group("treachery", &["revenge", "betrayal", "deception", "conspiracy", "plot"]),
    group("transformation", &["transformation", "change", "growth", "development", "evolution"]),
    group("sacrifice", &["sacrifice", "loss", "redemption", "forgiveness"]),
    group("romance", &["romance", "love", "relationship", "marriage", "affair"]),
    group("investigation", &["investigation", "detective", "crime", "murder", "mystery"]),
    group("danger", &["survival", "danger", "threat", "peril", "risk"]),
    group("power", &["power", "throne", "kingdom", "empire", "rule", "reign"]),
    group("uprising", &["rebellion", "revolution", "uprising", "resistance"]),
];

// ─── French ────────────────────────────────────────────────

static FR_THEMES: &[TagGroup] = &[
    group("love", &["amour", "romance", "relation", "famille", "amitié", "loyauté", "trahison"]),
    group("war", &["guerre", "bataille", "conflit", "combat", "lutte", "violence", "paix"]),
    group("crime", &["mystère", "détective", "crime", "meurtre", "enquête", "policier"]),
    group("fantasy", &["magie", "fantastique", "sorcier", "dragon", "sortilège", "mythe"]),
    group("science", &["science", "technologie", "espace", "futur", "robot", "extraterrestre", "temps"]),
    group("horror", &["horreur", "peur", "terreur", "fantôme", "monstre", "surnaturel", "sombre"]),
    group("power", &["pouvoir", "politique", "roi", "reine", "empire", "trône", "règne"]),
    group("mortality", &["mort", "vie", "survie", "espoir", "perte", "deuil", "renaissance"]),
    group("identity", &["identité", "soi", "mémoire", "passé", "secret", "vérité", "mensonge"]),
    group("society", &["société", "culture", "classe", "révolution", "rébellion", "liberté"]),
    group("nature", &["nature", "monde", "terre", "environnement", "animal", "sauvage"]),
    group("faith", &["religion", "dieu", "foi", "croyance", "spirituel", "divin"]),
];

static FR_PLOTS: &[TagGroup] = &[
    group("journey", &["voyage", "quête", "mission", "aventure", "périple", "expédition"]),
    group("discovery", &["découverte", "révélation", "secret", "mystère", "vérité"]),
    group("conflict", &["conflit", "lutte", "combat", "bataille", "guerre", "affrontement"]),
    group("rescue", &["évasion", "fuite", "sauvetage", "sauver", "protéger", "défendre"]),
    group("treachery", &["vengeance", "trahison", "tromperie", "conspiration", "complot"]),
    group("transformation", &["transformation", "changement", "croissance", "évolution"]),
    group("sacrifice", &["sacrifice", "perte", "rédemption", "pardon"]),
    group("romance", &["romance", "amour", "relation", "mariage", "liaison"]),
    group("investigation", &["enquête", "détective", "crime", "meurtre", "mystère"]),
    group("danger", &["survie", "danger", "menace", "péril", "risque"]),
    group("power", &["pouvoir", "trône", "royaume", "empire", "règne"]),
    group("uprising", &["rébellion", "révolution", "soulèvement", "résistance"]),
];

// ─── Spanish ───────────────────────────────────────────────

static ES_THEMES: &[TagGroup] = &[
    group("love", &["amor", "romance", "relación", "familia", "amistad", "lealtad", "traición"]),
    group("war", &["guerra", "batalla", "conflicto", "lucha", "violencia", "paz"]),
    group("crime", &["misterio", "detective", "crimen", "asesinato", "investigación", "suspense"]),
    group("fantasy", &["magia", "fantasía", "mago", "dragón", "hechizo", "mito"]),
    group("science", &["ciencia", "tecnología", "espacio", "futuro", "robot", "alienígena", "tiempo"]),
    group("horror", &["horror", "miedo", "terror", "fantasma", "monstruo", "sobrenatural", "oscuro"]),
    group("power", &["poder", "política", "rey", "reina", "imperio", "trono", "reinado"]),
    group("mortality", &["muerte", "vida", "supervivencia", "esperanza", "pérdida", "duelo"]),
    group("identity", &["identidad", "memoria", "pasado", "secreto", "verdad", "mentira"]),
    group("society", &["sociedad", "cultura", "clase", "revolución", "rebelión", "libertad"]),
    group("nature", &["naturaleza", "mundo", "tierra", "ambiente", "animal", "salvaje"]),
    group("faith", &["religión", "dios", "fe", "creencia", "espiritual", "divino"]),
];

static ES_PLOTS: &[TagGroup] = &[
    group("journey", &["viaje", "búsqueda", "misión", "aventura", "travesía", "expedición"]),
    group("discovery", &["descubrimiento", "revelación", "secreto", "misterio", "verdad"]),
    group("conflict", &["conflicto", "lucha", "pelea", "batalla", "guerra", "enfrentamiento"]),
    group("rescue", &["escape", "huida", "rescate", "salvar", "proteger", "defender"]),
    group("treachery", &["venganza", "traición", "engaño", "conspiración", "complot"]),
    group("transformation", &["transformación", "cambio", "crecimiento", "evolución"]),
    group("sacrifice", &["sacrificio", "pérdida", "redención", "perdón"]),
    group("romance", &["romance", "amor", "relación", "matrimonio", "aventura"]),
    group("investigation", &["investigación", "detective", "crimen", "asesinato", "misterio"]),
    group("danger", &["supervivencia", "peligro", "amenaza", "riesgo"]),
    group("power", &["poder", "trono", "reino", "imperio", "reinado"]),
    group("uprising", &["rebelión", "revolución", "levantamiento", "resistencia"]),
];

// ─── German ────────────────────────────────────────────────

static DE_THEMES: &[TagGroup] = &[
    group("love", &["liebe", "romantik", "beziehung", "familie", "freundschaft", "treue", "verrat"]),
    group("war", &["krieg", "schlacht", "konflikt", "kampf", "gewalt", "frieden"]),
    group("crime", &["geheimnis", "detektiv", "verbrechen", "mord", "ermittlung", "thriller"]),
    group("fantasy", &["magie", "fantasy", "zauberer", "drache", "zauber", "mythos"]),
    group("science", &["wissenschaft", "technik", "weltraum", "zukunft", "roboter", "außerirdische", "zeit"]),
    group("horror", &["horror", "angst", "schrecken", "geist", "monster", "übernatürlich", "dunkel"]),
    group("power", &["macht", "politik", "könig", "königin", "imperium", "thron", "herrschaft"]),
    group("mortality", &["tod", "leben", "überleben", "hoffnung", "verlust", "trauer"]),
    group("identity", &["identität", "erinnerung", "vergangenheit", "wahrheit", "lüge"]),
    group("society", &["gesellschaft", "kultur", "klasse", "revolution", "rebellion", "freiheit"]),
    group("nature", &["natur", "welt", "erde", "umwelt", "tier", "wildnis"]),
    group("faith", &["religion", "gott", "glaube", "spirituell", "göttlich"]),
];

static DE_PLOTS: &[TagGroup] = &[
    group("journey", &["reise", "suche", "mission", "abenteuer", "fahrt", "expedition"]),
    group("discovery", &["entdeckung", "enthüllung", "geheimnis", "rätsel", "wahrheit"]),
    group("conflict", &["konflikt", "kampf", "schlacht", "krieg", "konfrontation"]),
    group("rescue", &["flucht", "rettung", "retten", "schützen", "verteidigen"]),
    group("treachery", &["rache", "verrat", "täuschung", "verschwörung", "intrige"]),
    group("transformation", &["verwandlung", "veränderung", "wachstum", "entwicklung"]),
    group("sacrifice", &["opfer", "verlust", "erlösung", "vergebung"]),
    group("romance", &["romantik", "liebe", "beziehung", "ehe", "affäre"]),
    group("investigation", &["ermittlung", "detektiv", "verbrechen", "mord"]),
    group("danger", &["überleben", "gefahr", "bedrohung", "risiko"]),
    group("power", &["macht", "thron", "königreich", "imperium", "herrschaft"]),
    group("uprising", &["rebellion", "revolution", "aufstand", "widerstand"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_twelve_groups() {
        for language in Language::DETECTABLE {
            assert_eq!(theme_table(language).len(), 12);
            assert_eq!(plot_table(language).len(), 12);
        }
    }

    #[test]
    fn matches_whole_words_case_insensitively() {
        let themes = extract_themes("WAR and Peace in a Warlike age", Language::En);
        assert!(themes.contains("war"));
        assert!(themes.contains("peace"));
        // "warlike" is not "war"
        assert_eq!(themes.len(), 2);
    }

    #[test]
    fn synonyms_register_separately() {
        let plots = extract_plot_elements("A quest that becomes a journey.", Language::En);
        assert_eq!(
            plots.into_iter().collect::<Vec<_>>(),
            vec!["journey".to_string(), "quest".to_string()]
        );
        let tags = plot_tags("A quest that becomes a journey.", Language::En);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["journey"]);
    }

    #[test]
    fn quest_is_a_plot_element_not_a_theme() {
        let text = "A desert planet, a hero's journey, betrayal, and a quest for power.";
        let themes = extract_themes(text, Language::En);
        assert!(themes.contains("betrayal"));
        assert!(!themes.contains("quest"));
        let plots = extract_plot_elements(text, Language::En);
        assert!(plots.contains("quest"));
        assert!(plots.contains("journey"));
    }

    #[test]
    fn uses_language_table() {
        let text = "Une histoire d'amour et de trahison pendant la guerre.";
        let themes = extract_themes(text, Language::Fr);
        assert!(themes.contains("amour"));
        assert!(themes.contains("trahison"));
        assert!(themes.contains("guerre"));
        assert!(theme_tags(text, Language::Fr).contains("war"));
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let themes = extract_themes("magic dragon", Language::Unknown);
        assert!(themes.contains("magic"));
        assert!(themes.contains("dragon"));
    }
}
