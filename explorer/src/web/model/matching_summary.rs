use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::matching_summary::{DonorSummary, MatchingSummary, MatchingTotals, ProjectBreakdown};

#[derive(ToSchema, Clone, Serialize, Deserialize)]
pub struct MatchingSummaryResponse {
    pub summary: MatchingSummaryTotals,
    pub donors: Vec<DonorInfo>,
}

impl From<MatchingSummary> for MatchingSummaryResponse {
    fn from(matching_summary: MatchingSummary) -> Self {
        Self {
            summary: matching_summary.summary.into(),
            donors: matching_summary.donors.into_iter().map(|donor| donor.into()).collect(),
        }
    }
}

#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSummaryTotals {
    #[schema(example = "180.0")]
    pub total_matched: f64,
    #[schema(example = "3")]
    pub entry_count: u64,
    #[schema(example = "120")]
    pub total_donations: u64,
    #[schema(example = "110")]
    pub processed_donations: u64,
    #[schema(example = "104")]
    pub successful_donations: u64,
}

impl From<MatchingTotals> for MatchingSummaryTotals {
    fn from(totals: MatchingTotals) -> Self {
        Self {
            total_matched: to_f64(&totals.total_matched),
            entry_count: totals.entry_count,
            total_donations: totals.total_donations,
            processed_donations: totals.processed_donations,
            successful_donations: totals.successful_donations,
        }
    }
}

#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorInfo {
    #[schema(example = "670718cdf8133590e50b7770")]
    pub donor_id: String,
    #[schema(example = "Donor 1 (LF only)")]
    pub label: String,
    #[schema(example = "150.0")]
    pub total_matched: f64,
    #[schema(example = "2")]
    pub entry_count: u64,
    pub projects: Vec<ProjectInfo>,
}

impl From<DonorSummary> for DonorInfo {
    fn from(donor: DonorSummary) -> Self {
        Self {
            donor_id: donor.donor_id,
            label: donor.label,
            total_matched: to_f64(&donor.total_matched),
            entry_count: donor.entry_count,
            projects: donor.projects.into_iter().map(|project| project.into()).collect(),
        }
    }
}

#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[schema(example = "p1")]
    pub project_slug: String,
    #[schema(example = "150.0")]
    pub amount: f64,
    #[schema(example = "2")]
    pub count: u64,
}

impl From<ProjectBreakdown> for ProjectInfo {
    fn from(project: ProjectBreakdown) -> Self {
        Self { project_slug: project.project_slug, amount: to_f64(&project.amount), count: project.count }
    }
}

fn to_f64(amount: &BigDecimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn serializes_camel_case() {
        let summary = MatchingSummary {
            summary: MatchingTotals {
                total_matched: BigDecimal::from_str("180").unwrap(),
                entry_count: 3,
                total_donations: 4,
                processed_donations: 3,
                successful_donations: 2,
            },
            donors: vec![DonorSummary {
                donor_id: "670718cdf8133590e50b7770".to_string(),
                label: "Donor 1 (LF only)".to_string(),
                total_matched: BigDecimal::from_str("150").unwrap(),
                entry_count: 2,
                projects: vec![ProjectBreakdown { project_slug: "p1".to_string(), amount: BigDecimal::from_str("150").unwrap(), count: 2 }],
            }],
        };
        let response: MatchingSummaryResponse = summary.into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "summary": {"totalMatched": 180.0, "entryCount": 3, "totalDonations": 4, "processedDonations": 3, "successfulDonations": 2},
                "donors": [{
                    "donorId": "670718cdf8133590e50b7770",
                    "label": "Donor 1 (LF only)",
                    "totalMatched": 150.0,
                    "entryCount": 2,
                    "projects": [{"projectSlug": "p1", "amount": 150.0, "count": 2}]
                }]
            })
        );
    }
}
