//! Resolving a resource to the URL a download navigates to.

use course_portal_cache::CacheBackend;

use crate::PortalError;
use crate::state::Portal;

/// Where a download goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Code of the owning module.
    pub module_code: String,
    /// Resource title.
    pub title: String,
    /// Direct-download URL.
    pub download_url: String,
    /// Viewer URL.
    pub view_url: String,
}

/// Looks up a resource and returns its download target.
///
/// # Errors
///
/// * [`PortalError::UnknownModule`] if no module has `module_id`
/// * [`PortalError::UnknownResource`] if the module has no `resource_id`
/// * [`PortalError::Unavailable`] if the resource has no link
pub fn resolve_download<B: CacheBackend>(
    portal: &Portal<B>,
    module_id: &str,
    resource_id: &str,
) -> Result<DownloadTarget, PortalError> {
    let module = portal
        .module(module_id)
        .ok_or_else(|| PortalError::UnknownModule {
            id: module_id.to_string(),
        })?;
    let resource = module
        .resource(resource_id)
        .ok_or_else(|| PortalError::UnknownResource {
            module_id: module_id.to_string(),
            resource_id: resource_id.to_string(),
        })?;

    if !resource.is_downloadable() {
        return Err(PortalError::Unavailable {
            title: resource.title.clone(),
        });
    }

    log::debug!("Resolved {module_id}/{resource_id} to {}", resource.download_url);
    Ok(DownloadTarget {
        module_code: module.code.clone(),
        title: resource.title.clone(),
        download_url: resource.download_url.clone(),
        view_url: resource.view_url.clone(),
    })
}
