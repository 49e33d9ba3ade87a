use poem_openapi::Object;

/// Visitor counts by status
#[derive(Object, Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub registered: u64,
    pub active: u64,
    pub inactive: u64,

    /// Check-ins since midnight UTC
    pub checked_in_today: u64,
}
