//! Per-segment summaries over raw (unnormalized) records.
//!
//! Profiles are computed after a fit by grouping the original records by their
//! assigned cluster. They describe segments in business units (years, currency)
//! and give each one a readable name such as `"Affluent Middle-Aged Active"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Mean, minimum and maximum of one raw feature within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Summary {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            n += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        Self {
            mean: sum / n as f64,
            min,
            max,
        }
    }
}

/// Aggregate statistics for one non-empty segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentProfile {
    /// Cluster index.
    pub cluster: usize,
    /// Number of records assigned to the cluster.
    pub customer_count: usize,
    /// Age summary.
    pub age: Summary,
    /// Income summary.
    pub income: Summary,
    /// Purchase amount summary.
    pub purchase_amount: Summary,
}

/// Profile every non-empty cluster.
///
/// `assignments` must be index-aligned with `records` (as in
/// [`crate::KmeansFit::assignments`]). Profiles are ordered by cluster index;
/// clusters with no records get none.
///
/// Rows past the shorter of the two slices are ignored; debug builds assert
/// that the lengths match.
pub fn summarize<I>(records: &[Record<I>], assignments: &[usize]) -> Vec<SegmentProfile> {
    debug_assert_eq!(
        records.len(),
        assignments.len(),
        "assignments must be index-aligned with records"
    );
    let k = assignments.iter().max().map_or(0, |&m| m + 1);
    let mut members: Vec<Vec<&Record<I>>> = vec![Vec::new(); k];
    for (record, &label) in records.iter().zip(assignments) {
        members[label].push(record);
    }

    members
        .into_iter()
        .enumerate()
        .filter(|(_, m)| !m.is_empty())
        .map(|(cluster, m)| SegmentProfile {
            cluster,
            customer_count: m.len(),
            age: Summary::of(m.iter().map(|r| r.age)),
            income: Summary::of(m.iter().map(|r| r.income)),
            purchase_amount: Summary::of(m.iter().map(|r| r.purchase_amount)),
        })
        .collect()
}

/// Age band of a segment's mean age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    /// Under 30.
    Young,
    /// 30 to under 45.
    MiddleAged,
    /// 45 to under 60.
    Mature,
    /// 60 and over.
    Senior,
}

impl AgeBand {
    /// Classify a mean age.
    pub fn of(age: f64) -> Self {
        if age < 30.0 {
            AgeBand::Young
        } else if age < 45.0 {
            AgeBand::MiddleAged
        } else if age < 60.0 {
            AgeBand::Mature
        } else {
            AgeBand::Senior
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AgeBand::Young => "Young",
            AgeBand::MiddleAged => "Middle-Aged",
            AgeBand::Mature => "Mature",
            AgeBand::Senior => "Senior",
        })
    }
}

/// Income tier of a segment's mean income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeTier {
    /// Under 30 000.
    Budget,
    /// 30 000 to under 50 000.
    MidTier,
    /// 50 000 to under 70 000.
    Affluent,
    /// 70 000 and over.
    HighIncome,
}

impl IncomeTier {
    /// Classify a mean income.
    pub fn of(income: f64) -> Self {
        if income < 30_000.0 {
            IncomeTier::Budget
        } else if income < 50_000.0 {
            IncomeTier::MidTier
        } else if income < 70_000.0 {
            IncomeTier::Affluent
        } else {
            IncomeTier::HighIncome
        }
    }
}

impl fmt::Display for IncomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IncomeTier::Budget => "Budget",
            IncomeTier::MidTier => "Mid-Tier",
            IncomeTier::Affluent => "Affluent",
            IncomeTier::HighIncome => "High-Income",
        })
    }
}

/// Spending level of a segment's mean purchase amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendingLevel {
    /// Under 1 500.
    Conservative,
    /// 1 500 to under 2 500.
    Moderate,
    /// 2 500 to under 3 500.
    Active,
    /// 3 500 and over.
    Premium,
}

impl SpendingLevel {
    /// Classify a mean purchase amount.
    pub fn of(purchase_amount: f64) -> Self {
        if purchase_amount < 1_500.0 {
            SpendingLevel::Conservative
        } else if purchase_amount < 2_500.0 {
            SpendingLevel::Moderate
        } else if purchase_amount < 3_500.0 {
            SpendingLevel::Active
        } else {
            SpendingLevel::Premium
        }
    }
}

impl fmt::Display for SpendingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpendingLevel::Conservative => "Conservative",
            SpendingLevel::Moderate => "Moderate",
            SpendingLevel::Active => "Active",
            SpendingLevel::Premium => "Premium",
        })
    }
}

impl SegmentProfile {
    /// Age band of the mean age.
    pub fn age_band(&self) -> AgeBand {
        AgeBand::of(self.age.mean)
    }

    /// Income tier of the mean income.
    pub fn income_tier(&self) -> IncomeTier {
        IncomeTier::of(self.income.mean)
    }

    /// Spending level of the mean purchase amount.
    pub fn spending_level(&self) -> SpendingLevel {
        SpendingLevel::of(self.purchase_amount.mean)
    }

    /// Readable name: `"<income tier> <age band> <spending level>"`.
    pub fn name(&self) -> String {
        format!(
            "{} {} {}",
            self.income_tier(),
            self.age_band(),
            self.spending_level()
        )
    }

    /// One-sentence summary in business units.
    ///
    /// ```rust
    /// use segmenter::{summarize, Record};
    ///
    /// let records = vec![
    ///     Record::new(1, 34.0, 52_000.0, 2_600.0),
    ///     Record::new(2, 36.0, 58_000.0, 2_800.0),
    /// ];
    /// let profile = &summarize(&records, &[0, 0])[0];
    /// assert!(profile.description().starts_with("This segment consists of 2 customers"));
    /// ```
    pub fn description(&self) -> String {
        format!(
            "This segment consists of {} customers characterized by {} demographics \
             (avg age {:.1}), {} income levels (avg ${}), and {} spending behavior \
             (avg ${} per purchase).",
            group_thousands(self.customer_count as f64),
            self.age_band().to_string().to_lowercase(),
            self.age.mean,
            self.income_tier().to_string().to_lowercase(),
            group_thousands(self.income.mean),
            self.spending_level().to_string().to_lowercase(),
            group_thousands(self.purchase_amount.mean),
        )
    }

    /// Marketing actions for the segment. The first matching rule wins.
    pub fn recommendations(&self) -> [&'static str; 2] {
        let age = self.age.mean;
        let income = self.income.mean;
        let purchase = self.purchase_amount.mean;

        if income > 70_000.0 && purchase > 3_000.0 {
            [
                "Target with premium product offerings and exclusive services",
                "Implement VIP loyalty program with personalized benefits",
            ]
        } else if income > 70_000.0 && purchase < 2_000.0 {
            [
                "Identify barriers to purchase through targeted campaigns",
                "Introduce mid-tier to premium product lines",
            ]
        } else if age < 30.0 {
            [
                "Leverage social media marketing and influencer partnerships",
                "Offer entry-level product bundles and flexible payment plans",
            ]
        } else if (30.0..55.0).contains(&age) {
            [
                "Focus on value proposition and quality messaging",
                "Offer family-oriented products and bundled solutions",
            ]
        } else if age >= 55.0 {
            [
                "Emphasize ease of use, reliability, and customer support",
                "Provide clear documentation and instructional content",
            ]
        } else if income < 40_000.0 {
            // Only reachable when the mean age is not a number.
            [
                "Highlight value pricing and cost-saving benefits",
                "Offer payment plans and budget-friendly options",
            ]
        } else {
            [
                "Implement cross-selling strategies based on purchase history",
                "Create targeted email campaigns with personalized offers",
            ]
        }
    }
}

/// Round to a whole number and insert `,` between groups of three digits.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
