use toml::Value;

use super::{ConfigLayer, FieldSources};

/// Recursively deep-merge `overlay` into `base`.
///
/// - Tables merge recursively per-field.
/// - Scalars and arrays from the overlay **replace** the base value.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    merge_into(base, overlay, "", &mut |_: &str| {});
}

/// Deep-merge `overlay` into `base`, recording `layer` as the source of
/// every leaf the overlay sets. `prefix` is the dotted path of `base`.
pub fn deep_merge_tracking(
    base: &mut Value,
    overlay: &Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    merge_into(base, overlay, prefix, &mut |path: &str| {
        sources.insert(path.to_owned(), layer.clone());
    });
}

fn merge_into(base: &mut Value, overlay: &Value, prefix: &str, on_leaf: &mut dyn FnMut(&str)) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = join_path(prefix, key);
                match base_table.get_mut(key) {
                    Some(base_val) => merge_into(base_val, overlay_val, &path, on_leaf),
                    None => {
                        base_table.insert(key.clone(), overlay_val.clone());
                        visit_leaves(overlay_val, &path, on_leaf);
                    },
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            visit_leaves(overlay, prefix, on_leaf);
        },
    }
}

/// Call `on_leaf` for every non-table value under `val`. An empty table
/// counts as a leaf so that `[section.name]` headers are attributed too.
fn visit_leaves(val: &Value, prefix: &str, on_leaf: &mut dyn FnMut(&str)) {
    match val {
        Value::Table(table) if !table.is_empty() => {
            for (key, child) in table {
                visit_leaves(child, &join_path(prefix, key), on_leaf);
            }
        },
        _ => on_leaf(prefix),
    }
}

/// Dotted path of `key` under `prefix`.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
