//! Classification of verification comments.
//!
//! Matching is case-insensitive substring search. Reject keywords are always
//! checked first, so a comment that hits both lists is rejected. Within the
//! accept rules the first category (in configured order) with a hit wins,
//! and within a category the first keyword in order.
//!
//! Substring matching means a short keyword such as `up` also hits inside
//! longer words; rule authors are expected to pick keywords accordingly.

use indexmap::IndexMap;

/// Result of classifying one comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A reject keyword matched.
    Reject { keyword: String },
    /// An accept keyword matched.
    Accept { category: String, keyword: String },
    /// Nothing matched; the request is left for manual review.
    Ignore,
}

#[derive(Debug, Clone)]
struct Keyword {
    original: String,
    folded: String,
}

impl Keyword {
    fn new(original: &str) -> Option<Self> {
        let folded = original.to_lowercase();
        if folded.is_empty() {
            return None;
        }
        Some(Self {
            original: original.to_string(),
            folded,
        })
    }
}

/// Keyword classifier built from the rule store.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    reject: Vec<Keyword>,
    accept: Vec<(String, Vec<Keyword>)>,
}

impl Classifier {
    pub fn new(reject: &[String], accept: &IndexMap<String, Vec<String>>) -> Self {
        Self {
            reject: reject.iter().filter_map(|k| Keyword::new(k)).collect(),
            accept: accept
                .iter()
                .map(|(category, keywords)| {
                    (
                        category.clone(),
                        keywords.iter().filter_map(|k| Keyword::new(k)).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Classify a verification comment.
    pub fn classify(&self, comment: &str) -> Classification {
        let comment = comment.to_lowercase();

        if let Some(kw) = self.reject.iter().find(|kw| comment.contains(&kw.folded)) {
            return Classification::Reject {
                keyword: kw.original.clone(),
            };
        }

        for (category, keywords) in &self.accept {
            if let Some(kw) = keywords.iter().find(|kw| comment.contains(&kw.folded)) {
                return Classification::Accept {
                    category: category.clone(),
                    keyword: kw.original.clone(),
                };
            }
        }

        Classification::Ignore
    }
}
