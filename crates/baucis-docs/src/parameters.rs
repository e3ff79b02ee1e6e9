//! Catalog of the reusable query, path and header parameters.
//!
//! Every parameter lives once under `components.parameters`; operations and
//! path items only carry `$ref`s to it.

use indexmap::IndexMap;

use crate::openapi::{parameter_ref, Parameter, ParameterIn, RefOr, Schema};
use crate::operation::{OperationMode, Verb};

/// Header that switches PUT into an update-operator request.
pub const UPDATE_OPERATOR_HEADER: &str = "X-Baucis-Update-Operator";

const WIKI: &str = "https://github.com/wprl/baucis/wiki";

struct Entry {
    name: &'static str,
    location: ParameterIn,
    summary: &'static str,
    schema: fn() -> Schema,
}

fn int32() -> Schema {
    Schema::integer().with_format("int32")
}

const CATALOG: &[Entry] = &[
    Entry {
        name: "id",
        location: ParameterIn::Path,
        summary: "The identifier of the resource.",
        schema: Schema::string,
    },
    Entry {
        name: "skip",
        location: ParameterIn::Query,
        summary: "How many documents to skip.",
        schema: int32,
    },
    Entry {
        name: "limit",
        location: ParameterIn::Query,
        summary: "The maximum number of documents to send.",
        schema: int32,
    },
    Entry {
        name: "count",
        location: ParameterIn::Query,
        summary: "Set to true to return count instead of documents.",
        schema: Schema::boolean,
    },
    Entry {
        name: "conditions",
        location: ParameterIn::Query,
        summary: "Set the conditions used to find or remove the document(s).",
        schema: Schema::string,
    },
    Entry {
        name: "sort",
        location: ParameterIn::Query,
        summary: "Set the fields by which to sort.",
        schema: Schema::string,
    },
    Entry {
        name: "distinct",
        location: ParameterIn::Query,
        summary: "Set to a path name to retrieve an array of distinct values.",
        schema: Schema::string,
    },
    Entry {
        name: "hint",
        location: ParameterIn::Query,
        summary: "Add an index hint to the query (must be enabled per controller).",
        schema: Schema::string,
    },
    Entry {
        name: "comment",
        location: ParameterIn::Query,
        summary: "Add a comment to a query (must be enabled per controller).",
        schema: Schema::string,
    },
    Entry {
        name: "select",
        location: ParameterIn::Query,
        summary: "Select which paths will be returned by the query.",
        schema: Schema::string,
    },
    Entry {
        name: "populate",
        location: ParameterIn::Query,
        summary: "Specify which paths to populate.",
        schema: Schema::string,
    },
    Entry {
        name: UPDATE_OPERATOR_HEADER,
        location: ParameterIn::Header,
        summary: "**BYPASSES VALIDATION** May be used with PUT to update the document \
                  using $push, $pull, or $set.",
        schema: Schema::string,
    },
];

impl Entry {
    fn description(&self) -> String {
        match self.location {
            ParameterIn::Path => self.summary.to_string(),
            ParameterIn::Header => format!("{} [doc]({WIKI}/HTTP-Headers)", self.summary),
            ParameterIn::Query | ParameterIn::Cookie => format!(
                "{} [doc]({WIKI}/Query-String-Parameters#{})",
                self.summary, self.name
            ),
        }
    }

    fn to_parameter(&self) -> Parameter {
        Parameter {
            name: self.name.to_string(),
            location: self.location,
            description: Some(self.description()),
            required: self.location == ParameterIn::Path,
            deprecated: false,
            schema: Some((self.schema)()),
        }
    }
}

/// The full catalog, keyed by parameter name, in a stable order.
pub fn common_parameters() -> IndexMap<String, Parameter> {
    CATALOG
        .iter()
        .map(|entry| (entry.name.to_string(), entry.to_parameter()))
        .collect()
}

/// A `$ref` to a catalog parameter.
pub fn parameter_reference(name: &str) -> RefOr<Parameter> {
    RefOr::reference(parameter_ref(name))
}

fn references(names: &[&str]) -> Vec<RefOr<Parameter>> {
    names.iter().map(|name| parameter_reference(name)).collect()
}

/// Parameters specific to one verb on one kind of path.
pub fn operation_parameters(mode: OperationMode, verb: Verb) -> Vec<RefOr<Parameter>> {
    match (mode, verb) {
        (OperationMode::Instance, Verb::Put) => references(&[UPDATE_OPERATOR_HEADER]),
        (OperationMode::Collection, Verb::Get) => references(&[
            "count",
            "skip",
            "limit",
            "conditions",
            "distinct",
            "hint",
            "comment",
        ]),
        (OperationMode::Collection, Verb::Delete) => {
            references(&["skip", "limit", "conditions", "distinct", "hint", "comment"])
        }
        _ => Vec::new(),
    }
}

/// Parameters shared by every operation on a path.
pub fn path_parameters(mode: OperationMode) -> Vec<RefOr<Parameter>> {
    match mode {
        OperationMode::Instance => references(&["select", "populate", "id"]),
        OperationMode::Collection => references(&["select", "populate", "sort"]),
    }
}
