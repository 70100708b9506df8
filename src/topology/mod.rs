//! Parent/child host topology used to cascade downtimes.
//!
//! Checkmk models host dependencies as "parents". A host's effective parents
//! are its own `parents` attribute, or, if that is empty, the parents declared
//! on the nearest folder up its folder path. The graph built here is keyed the
//! other way round (parent -> children) so descendants can be walked from a
//! starting host.

use anyhow::Result;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::checkmk::{folder_path_from_id, CmkFolder, CmkHost, MonitoringApi};

/// Folder path -> parent hosts declared on that folder
pub type FolderParents = HashMap<String, Vec<String>>;

/// Parent host name -> child host names, in upstream host order
pub type ChildrenMap = HashMap<String, Vec<String>>;

/// Parents inherited from the nearest folder (the folder itself first, then
/// each ancestor up to `/`) that declares any. Empty if none do.
pub fn resolve_inherited_parents<'a>(
    folder_path: &str,
    folder_parents: &'a FolderParents,
) -> &'a [String] {
    let segments: Vec<&str> = folder_path.split('/').filter(|s| !s.is_empty()).collect();

    for len in (0..=segments.len()).rev() {
        let path = if len == 0 {
            "/".to_string()
        } else {
            format!("/{}", segments[..len].join("/"))
        };
        if let Some(parents) = folder_parents.get(&path).filter(|p| !p.is_empty()) {
            return parents;
        }
    }
    &[]
}

/// Index folder-level parent declarations by normalized folder path
pub fn folder_parents_from(folders: &[CmkFolder]) -> FolderParents {
    folders
        .iter()
        .filter(|f| !f.extensions.attributes.parents.is_empty())
        .map(|f| {
            (
                folder_path_from_id(&f.id),
                f.extensions.attributes.parents.clone(),
            )
        })
        .collect()
}

/// Build the parent -> children map. Offline hosts are skipped entirely.
pub fn children_map_from(hosts: &[CmkHost], folder_parents: &FolderParents) -> ChildrenMap {
    let mut children: ChildrenMap = HashMap::new();

    for host in hosts.iter().filter(|h| !h.is_offline()) {
        let parents = match host.explicit_parents() {
            [] => resolve_inherited_parents(host.folder(), folder_parents),
            direct => direct,
        };
        for parent in parents {
            children
                .entry(parent.clone())
                .or_default()
                .push(host.id.clone());
        }
    }

    children
}

/// Fetch folders and hosts of `site` and build its children map.
///
/// Either fetch failing fails the whole build.
pub async fn build_children_map(api: &dyn MonitoringApi, site: &str) -> Result<ChildrenMap> {
    let folders = api.list_folders().await?;
    let folder_parents = folder_parents_from(&folders);

    let hosts = api.list_hosts(site).await?;
    let children = children_map_from(&hosts, &folder_parents);

    tracing::debug!(
        site,
        hosts = hosts.len(),
        folders_with_parents = folder_parents.len(),
        parents = children.len(),
        "Built host dependency graph"
    );
    Ok(children)
}

/// Breadth-first descendants of `root`, in discovery order.
///
/// With `recursive == false` only direct children are returned. The root is
/// never part of the result and no host appears twice, cycles included.
pub fn descendants_of(root: &str, children: &ChildrenMap, recursive: bool) -> Vec<String> {
    let mut result = Vec::new();
    let mut queue = VecDeque::from([root]);
    let mut visited = HashSet::from([root]);

    while let Some(current) = queue.pop_front() {
        let Some(kids) = children.get(current) else {
            continue;
        };
        for child in kids {
            if visited.insert(child.as_str()) {
                result.push(child.clone());
                if recursive {
                    queue.push_back(child.as_str());
                }
            }
        }
    }

    result
}
