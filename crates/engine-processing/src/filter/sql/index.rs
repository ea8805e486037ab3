use engine_config::IndexHintPolicy;
use model::core::schema::RelationalSchema;
use tracing::{debug, warn};

/// Facts columns that may carry an `INDEXED BY` hint, most selective first.
pub const INDEX_PRIORITY: [&str; 6] = ["form", "revform", "lemma", "frequency", "len", "pos"];

/// Name of the facts index led by `column`. Part-of-speech aware corpora
/// carry a second set of indexes over `frequencyx`.
pub fn index_name(column: &str, posx: bool) -> String {
    let x = if posx { "x" } else { "" };
    match column {
        "frequency" => format!("idx_wordfreqs_freq{x}"),
        "pos" if posx => "idx_wordfreqs_posx_freqx".to_string(),
        other => format!("idx_wordfreqs_{other}_freq{x}"),
    }
}

/// Facts columns a query touches in a way an index can serve.
#[derive(Debug, Clone, Default)]
pub struct IndexUsage {
    touched: Vec<&'static str>,
    unanchored: bool,
}

impl IndexUsage {
    pub fn touch(&mut self, column: &str) {
        if let Some(&known) = INDEX_PRIORITY.iter().find(|c| **c == column) {
            if !self.touched.contains(&known) {
                self.touched.push(known);
            }
        }
    }

    /// Records a pattern no index can serve.
    pub fn unanchored(&mut self) {
        self.unanchored = true;
    }

    pub fn is_unanchored(&self) -> bool {
        self.unanchored
    }

    /// Picks the first candidate index that exists in the corpus. With no
    /// touched column the ORDER BY column supplies the candidate.
    pub fn choose(
        &self,
        policy: IndexHintPolicy,
        order_column: Option<&str>,
        posx: bool,
        schema: &RelationalSchema,
    ) -> Option<String> {
        match policy {
            IndexHintPolicy::Never => return None,
            IndexHintPolicy::Auto if self.unanchored => {
                debug!("Unanchored pattern, leaving index choice to the planner");
                return None;
            }
            _ => {}
        }

        let mut candidates: Vec<&str> = INDEX_PRIORITY
            .iter()
            .copied()
            .filter(|c| self.touched.contains(c))
            .collect();
        if candidates.is_empty() {
            candidates.extend(order_column.filter(|c| INDEX_PRIORITY.contains(c)));
        }

        for column in candidates {
            let name = index_name(column, posx);
            if schema.has_index(&name) {
                debug!("Index hint: {}", name);
                return Some(name);
            }
            warn!("Skipping index hint '{}': index not in corpus", name);
        }
        None
    }
}
