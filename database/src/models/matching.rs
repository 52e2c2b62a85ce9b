use bigdecimal::BigDecimal;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MatchingLogTotals {
    pub entry_count: i64,
    pub total_matched: BigDecimal,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct DonationTotals {
    pub total_donations: i64,
    pub processed_donations: i64,
    pub successful_donations: i64,
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct DonorTotal {
    pub donor_id: String,
    pub entry_count: i64,
    pub total_matched: BigDecimal,
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct DonorProjectTotal {
    pub donor_id: String,
    pub project_slug: String,
    pub entry_count: i64,
    pub amount: BigDecimal,
}
