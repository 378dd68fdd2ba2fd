// Native-handle resolution chain.
//
// Some project kinds expose a build-engine handle directly; others can only
// be resolved through the solution service, and some not at all. Each
// strategy is an explicit Result branch: a strategy that fails is logged and
// skipped, never fatal.

use crate::host::{NativeHandle, ProjectNode, SolutionService};

/// Resolve a project's native build-engine handle.
///
/// Tries, in order, stopping at the first hit:
/// 1. the node's own handle adapter,
/// 2. lookup by the node's `ProjectGuid` property,
/// 3. lookup by unique name,
/// 4. lookup by a project-reference encoding of the unique name.
///
/// Returns `None` when every strategy comes up empty or fails.
pub fn resolve_handle(
    project: &dyn ProjectNode,
    solution_service: &dyn SolutionService,
) -> Option<NativeHandle> {
    match project.native_handle() {
        Ok(Some(handle)) => return Some(handle),
        Ok(None) => {}
        Err(e) => tracing::debug!("direct handle adapter failed: {e}"),
    }

    match project_guid(project) {
        Some(guid) => match solution_service.project_of_guid(&guid) {
            Ok(Some(handle)) => return Some(handle),
            Ok(None) => {}
            Err(e) => tracing::debug!("handle lookup by guid {guid} failed: {e}"),
        },
        None => {}
    }

    let unique_name = project.unique_name();

    match solution_service.project_of_unique_name(unique_name) {
        Ok(Some(handle)) => return Some(handle),
        Ok(None) => {}
        Err(e) => tracing::debug!("handle lookup by unique name '{unique_name}' failed: {e}"),
    }

    match solution_service.project_of_projref(unique_name) {
        Ok(Some(handle)) => return Some(handle),
        Ok(None) => {}
        Err(e) => tracing::debug!("handle lookup by projref '{unique_name}' failed: {e}"),
    }

    tracing::debug!("no native handle for project '{}'", project.name());
    None
}

fn project_guid(project: &dyn ProjectNode) -> Option<String> {
    match project.property("ProjectGuid") {
        Ok(Some(guid)) if !guid.is_empty() => Some(guid),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("reading ProjectGuid failed: {e}");
            None
        }
    }
}
