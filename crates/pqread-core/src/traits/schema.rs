use crate::SchemaNode;

/// Trait for schema introspection
///
/// Paths are dotted and relative to the root struct, e.g. `address.city`.
/// List items are addressed as `item`, map entries as `key` and `value`.
pub trait SchemaInspector {
    /// Number of nodes below the root, nested ones included
    fn field_count(&self) -> usize;

    /// Get field by path (e.g., "address.city")
    fn get_field_by_path(&self, path: &str) -> Option<&SchemaNode>;

    /// Check if schema contains a specific field
    fn has_field(&self, name: &str) -> bool;

    /// Get all field paths in the schema, depth first
    fn all_field_paths(&self) -> Vec<String>;
}

impl SchemaInspector for crate::Schema {
    fn field_count(&self) -> usize {
        self.fields().iter().map(count_fields).sum()
    }

    fn get_field_by_path(&self, path: &str) -> Option<&SchemaNode> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let rest: Vec<&str> = parts.collect();
        self.fields()
            .iter()
            .find(|f| f.name() == first)
            .and_then(|f| get_field_by_path_parts(f, &rest))
    }

    fn has_field(&self, name: &str) -> bool {
        self.get_field_by_path(name).is_some()
    }

    fn all_field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for field in self.fields() {
            collect_field_paths(field, field.name().to_string(), &mut paths);
        }
        paths
    }
}

fn count_fields(node: &SchemaNode) -> usize {
    match node {
        SchemaNode::Struct { fields, .. } => 1 + fields.iter().map(count_fields).sum::<usize>(),
        SchemaNode::List { item, .. } => 1 + count_fields(item),
        SchemaNode::Map { key, value, .. } => 1 + count_fields(key) + count_fields(value),
        SchemaNode::Primitive { .. } => 1,
    }
}

fn get_field_by_path_parts<'a>(node: &'a SchemaNode, parts: &[&str]) -> Option<&'a SchemaNode> {
    let Some((first, rest)) = parts.split_first() else {
        return Some(node);
    };

    match node {
        SchemaNode::Struct { fields, .. } => fields
            .iter()
            .find(|f| f.name() == *first)
            .and_then(|f| get_field_by_path_parts(f, rest)),
        SchemaNode::List { item, .. } if *first == "item" => get_field_by_path_parts(item, rest),
        SchemaNode::Map { key, value, .. } => match *first {
            "key" => get_field_by_path_parts(key, rest),
            "value" => get_field_by_path_parts(value, rest),
            _ => None,
        },
        _ => None,
    }
}

fn collect_field_paths(node: &SchemaNode, current_path: String, paths: &mut Vec<String>) {
    paths.push(current_path.clone());

    match node {
        SchemaNode::Struct { fields, .. } => {
            for field in fields {
                collect_field_paths(field, format!("{}.{}", current_path, field.name()), paths);
            }
        }
        SchemaNode::List { item, .. } => {
            collect_field_paths(item, format!("{}.item", current_path), paths);
        }
        SchemaNode::Map { key, value, .. } => {
            collect_field_paths(key, format!("{}.key", current_path), paths);
            collect_field_paths(value, format!("{}.value", current_path), paths);
        }
        SchemaNode::Primitive { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrimitiveType, Schema};

    #[test]
    fn test_schema_inspector() {
        let schema = Schema {
            root: SchemaNode::Struct {
                name: "root".to_string(),
                nullable: false,
                fields: vec![
                    SchemaNode::Primitive {
                        name: "id".to_string(),
                        primitive_type: PrimitiveType::Int64,
                        nullable: false,
                    },
                    SchemaNode::Struct {
                        name: "address".to_string(),
                        nullable: true,
                        fields: vec![SchemaNode::Primitive {
                            name: "city".to_string(),
                            primitive_type: PrimitiveType::String,
                            nullable: true,
                        }],
                    },
                    SchemaNode::List {
                        name: "tags".to_string(),
                        nullable: true,
                        item: Box::new(SchemaNode::Primitive {
                            name: "item".to_string(),
                            primitive_type: PrimitiveType::String,
                            nullable: true,
                        }),
                    },
                ],
            },
        };

        assert_eq!(schema.field_count(), 5); // id, address, city, tags, item

        assert!(schema.has_field("id"));
        assert!(schema.has_field("address"));
        assert!(schema.has_field("address.city"));
        assert!(schema.has_field("tags.item"));
        assert!(!schema.has_field("missing"));
        assert!(!schema.has_field("id.nested"));

        let city = schema.get_field_by_path("address.city").unwrap();
        assert_eq!(city.name(), "city");

        assert_eq!(
            schema.all_field_paths(),
            vec!["id", "address", "address.city", "tags", "tags.item"]
        );
    }
}
