/// Named queries over the code graph.
pub struct QueryLibrary;

#[derive(Debug, Clone)]
pub struct Query {
    pub name: &'static str,
    pub description: &'static str,
    pub query: &'static str,
    pub parameters: &'static [QueryParameter],
}

#[derive(Debug, Clone)]
pub struct QueryParameter {
    pub name: &'static str,
    pub description: &'static str,
}

impl QueryLibrary {
    /// One row per path: the method, a direct neighbour over any
    /// relationship, and a neighbour of that neighbour. Parameters are
    /// dropped from the second hop.
    pub fn get_related_methods_query() -> Query {
        Query {
            name: "related_methods",
            description: "Get the nodes within two hops of every method with the given name.",
            query: r#"
                MATCH (m:Method {name: $method_name})
                OPTIONAL MATCH (m)-[r1]-(direct)
                OPTIONAL MATCH (direct)-[r2]-(indirect)
                WHERE label(indirect) <> 'Parameter'
                RETURN
                    m.id AS method,
                    label(r1) AS direct_relationship,
                    label(direct) AS direct_label,
                    direct.name AS direct_name,
                    label(r2) AS indirect_relationship,
                    label(indirect) AS indirect_label,
                    indirect.name AS indirect_name
                ORDER BY method, direct_label, direct_name, indirect_label, indirect_name
            "#,
            parameters: &[QueryParameter {
                name: "method_name",
                description: "Simple name of the method, e.g. `add`.",
            }],
        }
    }

    pub fn all_queries() -> Vec<Query> {
        vec![Self::get_related_methods_query()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_parameters_appear_in_query() {
        for query in QueryLibrary::all_queries() {
            for parameter in query.parameters {
                assert!(
                    query.query.contains(&format!("${}", parameter.name)),
                    "{} does not use ${}",
                    query.name,
                    parameter.name
                );
            }
        }
    }
}
