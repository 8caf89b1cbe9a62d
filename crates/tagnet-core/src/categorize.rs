//! Keyword-rule classification of tags and company descriptions into
//! business-domain categories.
//!
//! Two classifiers share one dictionary:
//!
//! - **Tags** are classified by exact anchor match: each category lists the
//!   tags that belong to it outright.
//! - **Free text** is classified by keyword scoring: occurrences of each
//!   category's keywords are counted and the highest score wins; a zero
//!   score everywhere means unclassified.
//!
//! Semantic-similarity fallback is a collaborator interface, not a bundled
//! model: the `SimilarityScorer` trait is the seam where an external
//! embedding service plugs in (to break keyword-score ties, or to classify
//! when keywords miss). Without one, ties resolve by dictionary order.

use crate::types::Tag;
use serde::Serialize;
use std::collections::HashMap;

/// External semantic-similarity collaborator. Implementations typically
/// call out to an embedding service; none ships with this crate.
pub trait SimilarityScorer {
    /// Similarity between a text and a category description. Higher is
    /// closer; the scale is implementation-defined but must be consistent.
    fn score(&self, text: &str, category: &str) -> f64;
}

/// How a classification was produced, for the `assigned_by` audit column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Assignment {
    /// Exact anchor-dictionary match.
    Rule,
    /// Keyword score, with the winning score.
    Keyword(u32),
    /// Keyword tie broken by a similarity scorer.
    KeywordTiebreak(u32),
    /// Similarity scorer alone (keywords all scored zero).
    Similarity(f64),
    /// Nothing matched.
    Unclassified,
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assignment::Rule => write!(f, "rule"),
            Assignment::Keyword(score) => write!(f, "keyword(max={})", score),
            Assignment::KeywordTiebreak(score) => write!(f, "keyword+tiebreak(max={})", score),
            Assignment::Similarity(sim) => write!(f, "similarity({:.2})", sim),
            Assignment::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// One tag's classification outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TagCategory {
    pub tag: Tag,
    pub category: Option<String>,
    pub assigned_by: Assignment,
}

/// Category dictionary: per category, anchor tags (exact-match rules) and
/// free-text keywords (substring scoring).
#[derive(Debug, Clone, Default)]
pub struct CategoryRules {
    /// Categories in declaration order; ties resolve toward earlier entries.
    categories: Vec<String>,
    keywords: HashMap<String, Vec<String>>,
    /// Reverse map: anchor tag → category.
    rule_map: HashMap<String, String>,
}

impl CategoryRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category with its anchor tags and text keywords.
    /// Re-registering an anchor under a second category keeps the first.
    pub fn add_category(&mut self, name: &str, anchors: &[&str], keywords: &[&str]) {
        self.categories.push(name.to_string());
        self.keywords
            .insert(name.to_string(), keywords.iter().map(|k| k.to_string()).collect());
        for anchor in anchors {
            self.rule_map
                .entry(anchor.to_string())
                .or_insert_with(|| name.to_string());
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Exact anchor-rule lookup for a tag.
    pub fn classify_tag(&self, tag: &str) -> Option<&str> {
        self.rule_map.get(tag).map(String::as_str)
    }

    /// Per-category keyword occurrence scores for a text.
    pub fn keyword_scores(&self, text: &str) -> Vec<(&str, u32)> {
        self.categories
            .iter()
            .map(|cat| {
                let score: u32 = self.keywords[cat]
                    .iter()
                    .map(|kw| text.matches(kw.as_str()).count() as u32)
                    .sum();
                (cat.as_str(), score)
            })
            .collect()
    }

    /// Classify a free-text description. Empty text is unclassified.
    pub fn classify_text(
        &self,
        text: &str,
        scorer: Option<&dyn SimilarityScorer>,
    ) -> (Option<String>, Assignment) {
        if text.trim().is_empty() || self.categories.is_empty() {
            return (None, Assignment::Unclassified);
        }

        let scores = self.keyword_scores(text);
        let max_score = scores.iter().map(|&(_, s)| s).max().unwrap_or(0);

        if max_score > 0 {
            let tied: Vec<&str> = scores
                .iter()
                .filter(|&&(_, s)| s == max_score)
                .map(|&(c, _)| c)
                .collect();
            if tied.len() == 1 {
                return (Some(tied[0].to_string()), Assignment::Keyword(max_score));
            }
            if let Some(scorer) = scorer {
                let best = tied
                    .iter()
                    .map(|&c| (c, scorer.score(text, c)))
                    .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(c, _)| c)
                    .unwrap_or(tied[0]);
                return (
                    Some(best.to_string()),
                    Assignment::KeywordTiebreak(max_score),
                );
            }
            // No scorer: first tied category in dictionary order.
            return (Some(tied[0].to_string()), Assignment::Keyword(max_score));
        }

        // Keywords all missed; a scorer may still place the text.
        if let Some(scorer) = scorer {
            if let Some((cat, sim)) = self
                .categories
                .iter()
                .map(|c| (c.as_str(), scorer.score(text, c)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            {
                return (Some(cat.to_string()), Assignment::Similarity(sim));
            }
        }
        (None, Assignment::Unclassified)
    }
}

/// Classify every tag through the anchor rules.
pub fn classify_tags(all_tags: &[Tag], rules: &CategoryRules) -> Vec<TagCategory> {
    all_tags
        .iter()
        .map(|tag| match rules.classify_tag(tag) {
            Some(cat) => TagCategory {
                tag: tag.clone(),
                category: Some(cat.to_string()),
                assigned_by: Assignment::Rule,
            },
            None => TagCategory {
                tag: tag.clone(),
                category: None,
                assigned_by: Assignment::Unclassified,
            },
        })
        .collect()
}

/// Distinct sorted categories a company's tags map into.
pub fn company_categories(tags: &[Tag], tag_map: &HashMap<Tag, String>) -> Vec<String> {
    let mut cats: Vec<String> = tags
        .iter()
        .filter_map(|t| tag_map.get(t).cloned())
        .collect();
    cats.sort();
    cats.dedup();
    cats
}

/// Majority vote over a company's tag categories. Ties break toward the
/// lexicographically smaller category for determinism.
pub fn primary_category(tags: &[Tag], tag_map: &HashMap<Tag, String>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in tags {
        if let Some(cat) = tag_map.get(tag) {
            *counts.entry(cat.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(cat, _)| cat.to_string())
}

/// The seven-category dictionary used for the startup dataset. Anchors and
/// keywords are Japanese because the source data is.
pub fn default_rules() -> CategoryRules {
    let mut rules = CategoryRules::new();
    rules.add_category(
        "メディア・エンタメ",
        &[
            "メディア", "エンタメ", "教育", "学習", "動画", "ゲーム",
            "SNS", "コミュニティ", "ライフイベント", "VR", "コンテンツ",
        ],
        &[
            "メディア", "エンタメ", "マンガ", "アニメ", "ゲーム", "動画",
            "番組", "配信", "ライブ", "イベント", "コミュニティ",
        ],
    );
    rules.add_category(
        "医療・ヘルスケア",
        &[
            "医療", "ヘルスケア", "健康管理", "医療機器", "介護",
            "製薬", "バイオ", "再生医療", "バイオテクノロジー", "MedTech",
        ],
        &[
            "医療", "ヘルスケア", "病院", "クリニック", "患者", "診療",
            "在宅医療", "看護", "介護", "薬", "健康", "予防", "検診",
        ],
    );
    rules.add_category(
        "IT・コンサルティング",
        &[
            "IT", "コンサルティング", "SaaS", "AI", "人工知能",
            "データ分析", "機械学習", "ディープラーニング",
            "システム開発", "ソフトウェア", "クラウドサービス",
            "業務効率化", "AdTech", "MarTech", "情報サービス", "プラットフォーム",
        ],
        &[
            "AI", "人工知能", "SaaS", "システム", "ソフトウェア", "アプリ",
            "プラットフォーム", "IT", "DX", "デジタル", "コンサルティング",
            "業務効率化", "データ分析", "クラウド",
        ],
    );
    rules.add_category(
        "小売・EC",
        &[
            "小売", "EC", "eコマース", "通販", "物流", "フード", "食",
            "食品・飲料", "シェアリング", "モビリティ", "自動車",
            "ドローン", "リテール",
        ],
        &[
            "EC", "通販", "オンラインストア", "小売", "店舗", "決済端末",
            "販売", "商品", "カート", "ショッピング", "出店",
        ],
    );
    rules.add_category(
        "金融・決済",
        &[
            "金融", "FinTech", "決済", "ブロックチェーン",
            "資産運用", "資産管理", "会計", "家計管理", "仮想通貨",
            "融資", "レンディング", "決済代行",
        ],
        &[
            "金融", "FinTech", "決済", "口座", "送金", "融資", "ローン",
            "資産運用", "資産管理", "証券", "保険", "与信", "請求",
        ],
    );
    rules.add_category(
        "レジャー・不動産",
        &[
            "レジャー", "不動産", "不動産管理", "不動産売買",
            "賃貸", "旅行", "スポーツ", "予約", "建設", "インフラ",
        ],
        &[
            "不動産", "賃貸", "売買", "物件", "マンション", "オフィス",
            "レジャー", "旅行", "観光", "ホテル", "宿泊", "キャンプ",
        ],
    );
    rules.add_category(
        "HR・採用",
        &[
            "HR", "採用", "採用支援", "人材", "人材育成", "人事制度",
            "労務", "転職", "副業", "クラウドソーシング", "バックオフィス支援",
        ],
        &[
            "採用", "人材", "人事", "労務", "転職", "求人", "評価制度",
            "タレントマネジメント", "副業", "リスキリング", "研修",
        ],
    );
    rules
}
