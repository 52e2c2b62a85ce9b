use std::collections::HashMap;

use bigdecimal::BigDecimal;
use db_explorer_database::client::ExplorerDbClient;
use db_explorer_database::error::DbError;
use db_explorer_database::models::matching::{DonorProjectTotal, DonorTotal};

const KNOWN_DONORS: [(&str, &str); 2] =
    [("670718cdf8133590e50b7770", "Donor 1 (LF only)"), ("670aea9001de0ce1382d49eb", "Donor 2 ($50k cap)")];

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectBreakdown {
    pub project_slug: String,
    pub amount: BigDecimal,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DonorSummary {
    pub donor_id: String,
    pub label: String,
    pub total_matched: BigDecimal,
    pub entry_count: u64,
    pub projects: Vec<ProjectBreakdown>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchingTotals {
    pub total_matched: BigDecimal,
    pub entry_count: u64,
    pub total_donations: u64,
    pub processed_donations: u64,
    pub successful_donations: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchingSummary {
    pub summary: MatchingTotals,
    pub donors: Vec<DonorSummary>,
}

#[derive(Clone)]
pub struct MatchingSummaryService {
    database: ExplorerDbClient,
}

impl MatchingSummaryService {
    pub fn new(database: ExplorerDbClient) -> Self {
        MatchingSummaryService { database }
    }

    pub async fn get_summary(&self) -> Result<MatchingSummary, DbError> {
        let (log_totals, donation_totals, donor_totals, donor_project_totals) = tokio::try_join!(
            self.database.select_matching_log_totals(),
            self.database.select_donation_totals(),
            self.database.select_donor_totals(),
            self.database.select_donor_project_totals(),
        )?;
        Ok(MatchingSummary {
            summary: MatchingTotals {
                total_matched: log_totals.total_matched,
                entry_count: to_count(log_totals.entry_count),
                total_donations: to_count(donation_totals.total_donations),
                processed_donations: to_count(donation_totals.processed_donations),
                successful_donations: to_count(donation_totals.successful_donations),
            },
            donors: build_donor_summaries(donor_totals, donor_project_totals),
        })
    }
}

pub fn donor_label(donor_id: &str) -> String {
    match KNOWN_DONORS.iter().find(|(known_id, _)| *known_id == donor_id) {
        Some((_, label)) => label.to_string(),
        None => format!("Donor {}...", donor_id.chars().take(8).collect::<String>()),
    }
}

/// Attaches the per-project breakdowns to their donor, keeping the donor order of `donor_totals`.
pub fn build_donor_summaries(donor_totals: Vec<DonorTotal>, donor_project_totals: Vec<DonorProjectTotal>) -> Vec<DonorSummary> {
    let mut projects_by_donor: HashMap<String, Vec<ProjectBreakdown>> = HashMap::new();
    for project in donor_project_totals {
        projects_by_donor.entry(project.donor_id).or_default().push(ProjectBreakdown {
            project_slug: project.project_slug,
            amount: project.amount,
            count: to_count(project.entry_count),
        });
    }
    donor_totals
        .into_iter()
        .map(|donor| {
            let mut projects = projects_by_donor.remove(&donor.donor_id).unwrap_or_default();
            projects.sort_by(|a, b| b.amount.cmp(&a.amount));
            DonorSummary {
                label: donor_label(&donor.donor_id),
                donor_id: donor.donor_id,
                total_matched: donor.total_matched,
                entry_count: to_count(donor.entry_count),
                projects,
            }
        })
        .collect()
}

fn to_count(count: i64) -> u64 {
    count.max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decimal(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn donor(donor_id: &str, entry_count: i64, total_matched: &str) -> DonorTotal {
        DonorTotal { donor_id: donor_id.to_string(), entry_count, total_matched: decimal(total_matched) }
    }

    fn project(donor_id: &str, project_slug: &str, entry_count: i64, amount: &str) -> DonorProjectTotal {
        DonorProjectTotal { donor_id: donor_id.to_string(), project_slug: project_slug.to_string(), entry_count, amount: decimal(amount) }
    }

    #[test]
    fn labels_known_and_unknown_donors() {
        assert_eq!(donor_label("670718cdf8133590e50b7770"), "Donor 1 (LF only)");
        assert_eq!(donor_label("670aea9001de0ce1382d49eb"), "Donor 2 ($50k cap)");
        assert_eq!(donor_label("abcdef0123456789"), "Donor abcdef01...");
        assert_eq!(donor_label("abc"), "Donor abc...");
    }

    #[test]
    fn two_donor_scenario() {
        let donors = build_donor_summaries(
            vec![donor("donor-a-000", 2, "150"), donor("donor-b-000", 1, "30")],
            vec![project("donor-a-000", "p1", 2, "150"), project("donor-b-000", "p2", 1, "30")],
        );
        assert_eq!(donors.len(), 2);
        assert_eq!(
            donors[0],
            DonorSummary {
                donor_id: "donor-a-000".to_string(),
                label: "Donor donor-a-...".to_string(),
                total_matched: decimal("150"),
                entry_count: 2,
                projects: vec![ProjectBreakdown { project_slug: "p1".to_string(), amount: decimal("150"), count: 2 }],
            }
        );
        assert_eq!(donors[1].donor_id, "donor-b-000");
        assert_eq!(donors[1].projects[0].amount, decimal("30"));
    }

    #[test]
    fn projects_sum_to_donor_totals() {
        let donors = build_donor_summaries(
            vec![donor("670aea9001de0ce1382d49eb", 5, "912.75"), donor("670718cdf8133590e50b7770", 2, "10.5")],
            vec![
                project("670718cdf8133590e50b7770", "lf", 2, "10.5"),
                project("670aea9001de0ce1382d49eb", "alpha", 1, "12.25"),
                project("670aea9001de0ce1382d49eb", "beta", 3, "800.50"),
                project("670aea9001de0ce1382d49eb", "gamma", 1, "100"),
            ],
        );
        for donor in &donors {
            let amount: BigDecimal = donor.projects.iter().map(|p| p.amount.clone()).sum();
            let count: u64 = donor.projects.iter().map(|p| p.count).sum();
            assert_eq!(amount, donor.total_matched);
            assert_eq!(count, donor.entry_count);
        }
        let slugs: Vec<&str> = donors[0].projects.iter().map(|p| p.project_slug.as_str()).collect();
        assert_eq!(slugs, vec!["beta", "gamma", "alpha"]);
        assert_eq!(donors[1].label, "Donor 1 (LF only)");
    }

    #[test]
    fn donor_without_projects_gets_empty_breakdown() {
        let donors = build_donor_summaries(vec![donor("lonely-donor", 0, "0")], vec![project("someone-else", "p9", 1, "1")]);
        assert!(donors[0].projects.is_empty());
    }
}
