use crate::graph::types::{NodeLabel, RelationshipKind};
use crate::schema::types::{ColumnDefinition, NodeTable, RelationshipTable};

pub static PROJECT_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Project,
    columns: &[
        ColumnDefinition::new("name").primary_key(),
        ColumnDefinition::new("path"),
    ],
};

pub static PACKAGE_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Package,
    columns: &[ColumnDefinition::new("name").primary_key()],
};

pub static FILE_TABLE: NodeTable = NodeTable {
    label: NodeLabel::File,
    columns: &[
        ColumnDefinition::new("path").primary_key(),
        ColumnDefinition::new("name"),
        ColumnDefinition::new("package"),
    ],
};

// Enums, records and annotation types share this table, told apart by `kind`
pub static CLASS_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Class,
    columns: &[
        ColumnDefinition::new("fullName").primary_key(),
        ColumnDefinition::new("name"),
        ColumnDefinition::new("kind"),
        ColumnDefinition::new("extends"),
    ],
};

pub static INTERFACE_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Interface,
    columns: &[
        ColumnDefinition::new("fullName").primary_key(),
        ColumnDefinition::new("name"),
    ],
};

pub static METHOD_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Method,
    columns: &[
        ColumnDefinition::new("id").primary_key(),
        ColumnDefinition::new("name"),
        ColumnDefinition::new("returnType"),
        ColumnDefinition::new("documentation"),
        ColumnDefinition::new("description"),
        ColumnDefinition::new("body"),
        ColumnDefinition::new("parentName"),
    ],
};

pub static FIELD_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Field,
    columns: &[
        ColumnDefinition::new("id").primary_key(),
        ColumnDefinition::new("name"),
        ColumnDefinition::new("type"),
        ColumnDefinition::new("className"),
    ],
};

pub static PARAMETER_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Parameter,
    columns: &[
        ColumnDefinition::new("id").primary_key(),
        ColumnDefinition::new("name"),
        ColumnDefinition::new("type"),
        ColumnDefinition::new("position").int64(),
        ColumnDefinition::new("methodId"),
    ],
};

pub static IMPORT_TABLE: NodeTable = NodeTable {
    label: NodeLabel::Import,
    columns: &[ColumnDefinition::new("name").primary_key()],
};

pub static NODE_TABLES: &[&NodeTable] = &[
    &PROJECT_TABLE,
    &PACKAGE_TABLE,
    &FILE_TABLE,
    &CLASS_TABLE,
    &INTERFACE_TABLE,
    &METHOD_TABLE,
    &FIELD_TABLE,
    &PARAMETER_TABLE,
    &IMPORT_TABLE,
];

pub static CONTAINS: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::Contains,
    from_to_pairs: &[
        (&PROJECT_TABLE, &FILE_TABLE),
        (&PACKAGE_TABLE, &PACKAGE_TABLE),
        (&PACKAGE_TABLE, &FILE_TABLE),
        (&PACKAGE_TABLE, &CLASS_TABLE),
        (&PACKAGE_TABLE, &INTERFACE_TABLE),
        (&FILE_TABLE, &CLASS_TABLE),
        (&FILE_TABLE, &INTERFACE_TABLE),
    ],
};

pub static DECLARES: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::Declares,
    from_to_pairs: &[(&CLASS_TABLE, &METHOD_TABLE), (&INTERFACE_TABLE, &METHOD_TABLE)],
};

pub static HAS_FIELD: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::HasField,
    from_to_pairs: &[(&CLASS_TABLE, &FIELD_TABLE)],
};

pub static HAS_PARAMETER: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::HasParameter,
    from_to_pairs: &[(&METHOD_TABLE, &PARAMETER_TABLE)],
};

pub static EXTENDS: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::Extends,
    from_to_pairs: &[
        (&CLASS_TABLE, &CLASS_TABLE),
        (&CLASS_TABLE, &INTERFACE_TABLE),
        (&INTERFACE_TABLE, &INTERFACE_TABLE),
    ],
};

pub static IMPLEMENTS: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::Implements,
    from_to_pairs: &[(&CLASS_TABLE, &INTERFACE_TABLE)],
};

pub static IMPORTS: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::Imports,
    from_to_pairs: &[(&FILE_TABLE, &IMPORT_TABLE)],
};

pub static DEPENDS_ON: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::DependsOn,
    from_to_pairs: &[(&FILE_TABLE, &FILE_TABLE)],
};

pub static REFERENCES: RelationshipTable = RelationshipTable {
    kind: RelationshipKind::References,
    from_to_pairs: &[(&METHOD_TABLE, &CLASS_TABLE), (&METHOD_TABLE, &INTERFACE_TABLE)],
};

pub static RELATIONSHIP_TABLES: &[&RelationshipTable] = &[
    &CONTAINS,
    &DECLARES,
    &HAS_FIELD,
    &HAS_PARAMETER,
    &EXTENDS,
    &IMPLEMENTS,
    &IMPORTS,
    &DEPENDS_ON,
    &REFERENCES,
];

pub fn node_table(label: NodeLabel) -> &'static NodeTable {
    match label {
        NodeLabel::Project => &PROJECT_TABLE,
        NodeLabel::Package => &PACKAGE_TABLE,
        NodeLabel::File => &FILE_TABLE,
        NodeLabel::Class => &CLASS_TABLE,
        NodeLabel::Interface => &INTERFACE_TABLE,
        NodeLabel::Method => &METHOD_TABLE,
        NodeLabel::Field => &FIELD_TABLE,
        NodeLabel::Parameter => &PARAMETER_TABLE,
        NodeLabel::Import => &IMPORT_TABLE,
    }
}

pub fn relationship_table(kind: RelationshipKind) -> &'static RelationshipTable {
    match kind {
        RelationshipKind::Contains => &CONTAINS,
        RelationshipKind::Declares => &DECLARES,
        RelationshipKind::HasField => &HAS_FIELD,
        RelationshipKind::HasParameter => &HAS_PARAMETER,
        RelationshipKind::Extends => &EXTENDS,
        RelationshipKind::Implements => &IMPLEMENTS,
        RelationshipKind::Imports => &IMPORTS,
        RelationshipKind::DependsOn => &DEPENDS_ON,
        RelationshipKind::References => &REFERENCES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_primary_keys_match_label_keys() {
        for label in NodeLabel::iter() {
            let table = node_table(label);
            assert_eq!(table.label, label);
            assert_eq!(
                table.primary_key().map(|column| column.name),
                Some(label.key_property()),
                "{label}"
            );
        }
    }

    #[test]
    fn test_every_table_is_registered() {
        assert_eq!(NODE_TABLES.len(), NodeLabel::iter().count());
        assert_eq!(RELATIONSHIP_TABLES.len(), RelationshipKind::iter().count());
    }

    #[test]
    fn test_extends_allows_class_to_interface_but_not_reverse() {
        assert!(EXTENDS.connects(NodeLabel::Class, NodeLabel::Interface));
        assert!(!EXTENDS.connects(NodeLabel::Interface, NodeLabel::Class));
        assert!(IMPLEMENTS.connects(NodeLabel::Class, NodeLabel::Interface));
        assert!(!IMPLEMENTS.connects(NodeLabel::Class, NodeLabel::Class));
    }
}
