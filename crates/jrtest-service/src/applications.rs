//! Library application listing

use crate::models::ApplicationInfo;
use crate::service::JrTestService;
use jrtest_core::{CancelSignal, ExecutionIdentity, ResultEnvelope, ServiceResult, WorkspaceId};

const READ_APPLICATIONS_FAILED: &str = "ReadApplications Failed";

impl JrTestService {
    /// Applications installed in the instance library.
    ///
    /// A missing capability is not distinguished: every failure is an
    /// operation failure.
    pub async fn list_applications(
        &self,
        cancel: &CancelSignal,
    ) -> ServiceResult<ResultEnvelope<Vec<ApplicationInfo>>> {
        let result: ServiceResult<Vec<ApplicationInfo>> = async {
            let manager = self
                .deps
                .proxies
                .library_applications(ExecutionIdentity::System)?;
            manager.read_all(WorkspaceId::ADMIN, cancel).await
        }
        .await;

        if let Err(e) = &result {
            tracing::warn!(error = %e, "Reading library applications failed");
        }
        ResultEnvelope::capture_collapsed(result, READ_APPLICATIONS_FAILED)
    }
}
