// Project and configuration resolution over the host's live object model.
//
// All walks here are borrow-only: nothing is owned, nothing is mutated, and
// traversal uses explicit stacks so pathological project trees cannot blow
// the call stack.

use crate::host::{ProjectKind, ProjectNode, SolutionConfig};

/// Find a project node by logical name.
///
/// Pre-order depth-first walk, siblings in host-given order. Solution
/// folders are never match candidates; their children (including nested
/// sub-solutions) are descended into. An ordinary project matches when its
/// simple name equals `project_name` case-insensitively, or its unique path
/// ends with `{project_name}.vcxproj` or `{project_name}.csproj`
/// case-insensitively. The first match in traversal order wins.
pub fn find_project<'a>(
    roots: &[&'a dyn ProjectNode],
    project_name: &str,
) -> Option<&'a dyn ProjectNode> {
    let mut stack: Vec<&'a dyn ProjectNode> = Vec::new();
    for root in roots.iter().rev() {
        stack.push(*root);
    }

    while let Some(node) = stack.pop() {
        match node.kind() {
            ProjectKind::SolutionFolder => {
                let children = node.children();
                for child in children.into_iter().rev() {
                    stack.push(child);
                }
            }
            ProjectKind::Project => {
                if project_matches(node, project_name) {
                    return Some(node);
                }
            }
            // Item-level nodes never appear at solution level; skip them.
            ProjectKind::Folder | ProjectKind::Item => {}
        }
    }

    tracing::debug!("project '{project_name}' not found in solution tree");
    None
}

fn project_matches(node: &dyn ProjectNode, project_name: &str) -> bool {
    if node.name().eq_ignore_ascii_case(project_name) {
        return true;
    }

    let unique = node.unique_name().to_ascii_lowercase();
    let name = project_name.to_ascii_lowercase();
    unique.ends_with(&format!("{name}.vcxproj")) || unique.ends_with(&format!("{name}.csproj"))
}

/// Trailing path segment of a project path, slash- or backslash-separated.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Find the build configuration matching a logical name and platform.
///
/// Phase 1 looks for an exact composite display name
/// `"{config_name}|{platform}"` (case-insensitive) and returns immediately
/// on a hit. Phase 2 falls back to configurations named `config_name` or
/// starting with `config_name + "|"`, scanning their per-project contexts
/// for one whose project file name matches `project_file_name` and whose
/// platform equals the target, with `"x64"` accepted as an alias when the
/// target is `"Win64"`. The first configuration yielding a context match
/// ends the search.
pub fn find_configuration<'a>(
    configs: &[&'a dyn SolutionConfig],
    config_name: &str,
    platform: &str,
    project_file_name: &str,
) -> Option<&'a dyn SolutionConfig> {
    let composite = format!("{config_name}|{platform}");
    for config in configs {
        if config.name().eq_ignore_ascii_case(&composite) {
            return Some(*config);
        }
    }

    let prefix = format!("{}|", config_name.to_ascii_lowercase());
    for config in configs {
        let eligible = config.name().eq_ignore_ascii_case(config_name)
            || config.name().to_ascii_lowercase().starts_with(&prefix);
        if !eligible {
            continue;
        }

        for context in config.contexts() {
            let context_file = file_name_of(&context.project_name);
            if !context_file.eq_ignore_ascii_case(project_file_name) {
                continue;
            }

            if platform_matches(&context.platform_name, platform) {
                return Some(*config);
            }
        }
    }

    tracing::debug!("configuration '{config_name}' with platform '{platform}' not found");
    None
}

fn platform_matches(context_platform: &str, target_platform: &str) -> bool {
    context_platform.eq_ignore_ascii_case(target_platform)
        || (context_platform.eq_ignore_ascii_case("x64")
            && target_platform.eq_ignore_ascii_case("Win64"))
}

/// Discover mod names under a project's `Mods` folder.
///
/// Locates `project_name`, walks its item tree for a node named `Mods`, and
/// returns the names of that folder's direct folder-kind children in host
/// order. Any missing link yields an empty list, not an error.
pub fn discover_mods(roots: &[&dyn ProjectNode], project_name: &str) -> Vec<String> {
    let Some(project) = find_project(roots, project_name) else {
        tracing::debug!("mod discovery: project '{project_name}' not found");
        return Vec::new();
    };

    let mut stack: Vec<&dyn ProjectNode> = Vec::new();
    for child in project.children().into_iter().rev() {
        stack.push(child);
    }

    while let Some(node) = stack.pop() {
        if node.name().eq_ignore_ascii_case("Mods") {
            let mods: Vec<String> = node
                .children()
                .into_iter()
                .filter(|child| child.kind() == ProjectKind::Folder)
                .map(|child| child.name().to_string())
                .collect();
            tracing::debug!("mod discovery: found {} mods", mods.len());
            return mods;
        }

        for child in node.children().into_iter().rev() {
            stack.push(child);
        }
    }

    tracing::debug!("mod discovery: Mods folder not found under '{project_name}'");
    Vec::new()
}
