//! Input-tree validation, run in full before the first remote call.

use crate::input::InputNode;
use crate::model::EntityKind;
use crate::sanitize;
use crate::schema::{self, TargetKind};

use super::MutationError;

/// Walk the whole tree with an explicit stack and reject anything the
/// engines would otherwise discover mid-flight, when statements are already
/// committed. `root_exists` marks the root as a patch target rather than a
/// node about to be created, which exempts it from creation rules.
pub(crate) fn validate_tree(
    root: &InputNode,
    max_depth: usize,
    root_exists: bool,
) -> Result<(), MutationError> {
    let mut stack: Vec<(&InputNode, usize)> = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        let is_root = std::ptr::eq(node, root);
        if depth > max_depth {
            return Err(MutationError::InvalidInput {
                field: "input",
                reason: format!("nesting exceeds the depth bound of {max_depth}"),
            });
        }

        for scalar in &node.scalars {
            if let Some(language) = scalar.language.as_deref() {
                sanitize::validate_language_tag(language).map_err(|e| {
                    MutationError::InvalidInput {
                        field: scalar.field,
                        reason: e.to_string(),
                    }
                })?;
            }
        }

        if node.id.is_none() && !(is_root && root_exists) {
            validate_new_node(node)?;
        }

        for relation in &node.relations {
            let spec = schema::relation(node.kind, relation.field).ok_or_else(|| {
                MutationError::UnknownRelation {
                    kind: node.kind,
                    field: relation.field.to_string(),
                }
            })?;
            if !spec.writable() {
                return Err(MutationError::NotWritable {
                    kind: node.kind,
                    field: relation.field.to_string(),
                });
            }
            for child in &relation.nodes {
                if !kind_satisfies(child.kind, spec.target) {
                    return Err(MutationError::InvalidInput {
                        field: spec.field,
                        reason: format!(
                            "expected {:?} target, got {}",
                            spec.target, child.kind
                        ),
                    });
                }
                stack.push((child, depth + 1));
            }
        }
    }

    Ok(())
}

fn kind_satisfies(kind: EntityKind, target: TargetKind) -> bool {
    match target {
        TargetKind::Exact(expected) => kind == expected,
        TargetKind::Resource => kind.is_production_resource(),
    }
}

/// Kind-specific rules for nodes that will actually be created.
fn validate_new_node(node: &InputNode) -> Result<(), MutationError> {
    if node.kind != EntityKind::Property {
        return Ok(());
    }

    let has_semantic = node
        .relations
        .iter()
        .any(|relation| relation.field == "semanticReferences" && !relation.nodes.is_empty());

    let scalar = |field: &str| {
        node.scalars
            .iter()
            .find(|scalar| scalar.field == field)
    };
    let label = scalar("label");
    let has_described_label = label
        .map(|s| s.text.is_some() && s.language.is_some())
        .unwrap_or(false)
        && scalar("description")
            .map(|s| s.text.is_some())
            .unwrap_or(false);

    if has_semantic || has_described_label {
        Ok(())
    } else {
        Err(MutationError::InvalidInput {
            field: "property",
            reason: "a property needs a semantic reference, or a label, description and \
                     label language code"
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{CommonInput, PropertyInput, SemanticReferenceInput};

    #[test]
    fn property_without_semantics_or_labels_is_rejected() {
        let node = PropertyInput {
            value: Some("42".into()),
            ..PropertyInput::default()
        }
        .into_node();
        assert!(matches!(
            validate_tree(&node, 8, false),
            Err(MutationError::InvalidInput { field: "property", .. })
        ));
    }

    #[test]
    fn property_with_semantic_reference_passes() {
        let node = PropertyInput {
            semantic_references: vec![SemanticReferenceInput {
                source_uri: Some("https://eclass.eu/0173-1#02-AAH880".into()),
                ..SemanticReferenceInput::default()
            }],
            ..PropertyInput::default()
        }
        .into_node();
        assert!(validate_tree(&node, 8, false).is_ok());
    }

    #[test]
    fn property_with_full_label_block_passes() {
        let node = PropertyInput {
            common: CommonInput {
                label: Some("Nennleistung".into()),
                label_language_code: Some("de".into()),
                description: Some("Leistung im Dauerbetrieb".into()),
                ..CommonInput::default()
            },
            ..PropertyInput::default()
        }
        .into_node();
        assert!(validate_tree(&node, 8, false).is_ok());
    }

    #[test]
    fn malformed_language_tag_is_rejected_before_io() {
        let node = PropertyInput {
            common: CommonInput {
                label: Some("x".into()),
                label_language_code: Some("not a tag".into()),
                description: Some("y".into()),
                ..CommonInput::default()
            },
            ..PropertyInput::default()
        }
        .into_node();
        assert!(matches!(
            validate_tree(&node, 8, false),
            Err(MutationError::InvalidInput { field: "label", .. })
        ));
    }
}
