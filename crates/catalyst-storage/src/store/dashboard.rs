use catalyst_common::types::ContactStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;
use crate::store::ContentStore;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DashboardCounts {
    pub services: u64,
    pub case_studies: u64,
    pub blog_posts: u64,
    pub new_contact_submissions: u64,
    pub contact_submissions: u64,
    pub careers: u64,
    pub team_members: u64,
}

impl ContentStore {
    pub async fn dashboard_counts(&self) -> Result<DashboardCounts> {
        Ok(DashboardCounts {
            services: self.count_services().await?,
            case_studies: self.count_case_studies().await?,
            blog_posts: self.count_blog_posts().await?,
            new_contact_submissions: self
                .count_contact_submissions(Some(ContactStatus::New))
                .await?,
            contact_submissions: self.count_contact_submissions(None).await?,
            careers: self.count_careers().await?,
            team_members: self.count_team_members().await?,
        })
    }
}
