//! Customization input and its fluent builder.
//!
//! [`CustomizationOptions`] is the plain value the assembler consumes.
//! [`OpenApiOptions`] builds one fluently; containers such as `servers` or
//! `components` only appear once a method that fills them has been called.
//!
//! ```
//! use baucis_docs::{OpenApiOptions, ServerVariables};
//!
//! let options = OpenApiOptions::new()
//!     .title("Vegetable API")
//!     .add_server(
//!         "https://{env}.example.com/api",
//!         Some("Main"),
//!         Some(ServerVariables::new().add_server_var("env", &["dev", "prod"], "dev", None)),
//!     )
//!     .add_security_jwt("bearer")
//!     .build();
//!
//! assert_eq!(options.info.unwrap().version.as_deref(), Some("0.0.1"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::openapi::{
    Components, Contact, ExternalDocumentation, Info, License, OAuthFlow, OAuthFlows,
    ParameterIn, PathItem, SecurityRequirement, SecurityScheme, Server, ServerVariable,
};

/// Title set by the builder when none is given.
pub const BUILDER_DEFAULT_TITLE: &str = "app";

/// Version set by the builder when none is given.
pub const BUILDER_DEFAULT_VERSION: &str = "0.0.1";

/// Collaborator-supplied overlay merged over the generated document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOptions {
    /// API metadata; missing fields are defaulted or omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    /// Servers; a single `/api` entry is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,
    /// Document-wide security requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    /// External documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "externalDocs", alias = "externalDoc")]
    pub external_docs: Option<ExternalDocumentation>,
    /// Paths that replace or extend generated ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<IndexMap<String, PathItem>>,
    /// Components that replace or extend generated ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

/// Fluent builder for [`CustomizationOptions`].
#[derive(Debug, Clone)]
pub struct OpenApiOptions {
    options: CustomizationOptions,
}

impl Default for OpenApiOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiOptions {
    /// Creates a builder with title `app` and version `0.0.1`.
    pub fn new() -> Self {
        Self {
            options: CustomizationOptions {
                info: Some(Info {
                    title: Some(BUILDER_DEFAULT_TITLE.to_string()),
                    version: Some(BUILDER_DEFAULT_VERSION.to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }

    fn info(&mut self) -> &mut Info {
        self.options.info.get_or_insert_with(Info::default)
    }

    fn security_schemes(&mut self) -> &mut IndexMap<String, SecurityScheme> {
        &mut self
            .options
            .components
            .get_or_insert_with(Components::default)
            .security_schemes
    }

    /// Set the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.info().title = Some(title.into());
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.info().version = Some(version.into());
        self
    }

    /// Set the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info().description = Some(description.into());
        self
    }

    /// Set the terms of service URL.
    #[must_use]
    pub fn terms_of_service(mut self, url: impl Into<String>) -> Self {
        self.info().terms_of_service = Some(url.into());
        self
    }

    /// Set contact information.
    #[must_use]
    pub fn contact(
        mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.info().contact = Some(Contact {
            name: Some(name.into()),
            url: Some(url.into()),
            email: Some(email.into()),
        });
        self
    }

    /// Set license information.
    #[must_use]
    pub fn license(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.info().license = Some(License {
            name: name.into(),
            url: Some(url.into()),
        });
        self
    }

    /// Append a server.
    #[must_use]
    pub fn add_server(
        mut self,
        url: impl Into<String>,
        description: Option<&str>,
        variables: Option<ServerVariables>,
    ) -> Self {
        self.options.servers.get_or_insert_with(Vec::new).push(Server {
            url: url.into(),
            description: description.map(str::to_string),
            variables: variables.map(ServerVariables::build).unwrap_or_default(),
        });
        self
    }

    /// Set the external documentation link.
    #[must_use]
    pub fn external_doc(mut self, description: impl Into<String>, url: impl Into<String>) -> Self {
        self.options.external_docs = Some(ExternalDocumentation {
            description: Some(description.into()),
            url: url.into(),
        });
        self
    }

    /// Add an HTTP basic security scheme.
    #[must_use]
    pub fn add_security_scheme_basic_auth(mut self, name: impl Into<String>) -> Self {
        self.security_schemes().insert(
            name.into(),
            SecurityScheme::Http {
                scheme: "basic".to_string(),
                bearer_format: None,
                description: None,
            },
        );
        self
    }

    /// Add an API key security scheme; the key travels in a header unless
    /// another location is given.
    #[must_use]
    pub fn add_security_scheme_api_key(
        mut self,
        name: impl Into<String>,
        location: Option<ParameterIn>,
    ) -> Self {
        let name = name.into();
        self.security_schemes().insert(
            name.clone(),
            SecurityScheme::ApiKey {
                name,
                location: location.unwrap_or(ParameterIn::Header),
                description: None,
            },
        );
        self
    }

    /// Add a JWT bearer security scheme.
    #[must_use]
    pub fn add_security_jwt(mut self, name: impl Into<String>) -> Self {
        self.security_schemes().insert(
            name.into(),
            SecurityScheme::Http {
                scheme: "bearer".to_string(),
                bearer_format: Some("JWT".to_string()),
                description: None,
            },
        );
        self
    }

    /// Add an OAuth2 implicit flow security scheme.
    #[must_use]
    pub fn add_security_scheme_oauth2_implicit<I, K, V>(
        mut self,
        name: impl Into<String>,
        authorization_url: impl Into<String>,
        scopes: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let flow = OAuthFlow {
            authorization_url: Some(authorization_url.into()),
            scopes: collect_scopes(scopes),
            ..Default::default()
        };
        self.security_schemes().insert(
            name.into(),
            SecurityScheme::OAuth2 {
                flows: OAuthFlows {
                    implicit: Some(flow),
                    ..Default::default()
                },
                description: None,
            },
        );
        self
    }

    /// Add an OAuth2 authorization code flow security scheme.
    #[must_use]
    pub fn add_security_scheme_oauth2_auth_code<I, K, V>(
        mut self,
        name: impl Into<String>,
        authorization_url: impl Into<String>,
        token_url: impl Into<String>,
        scopes: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let flow = OAuthFlow {
            authorization_url: Some(authorization_url.into()),
            token_url: Some(token_url.into()),
            scopes: collect_scopes(scopes),
            ..Default::default()
        };
        self.security_schemes().insert(
            name.into(),
            SecurityScheme::OAuth2 {
                flows: OAuthFlows {
                    authorization_code: Some(flow),
                    ..Default::default()
                },
                description: None,
            },
        );
        self
    }

    /// Require a security scheme for the whole document.
    #[must_use]
    pub fn add_security_requirement<I, S>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requirement = IndexMap::from([(
            scheme.into(),
            scopes.into_iter().map(Into::into).collect(),
        )]);
        self.options
            .security
            .get_or_insert_with(Vec::new)
            .push(requirement);
        self
    }

    /// Add or replace a path.
    #[must_use]
    pub fn add_path(mut self, path: impl Into<String>, item: PathItem) -> Self {
        self.options
            .paths
            .get_or_insert_with(IndexMap::new)
            .insert(path.into(), item);
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> CustomizationOptions {
        self.options
    }
}

fn collect_scopes<I, K, V>(scopes: I) -> IndexMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    scopes
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Builder for a server's URL template variables.
#[derive(Debug, Clone, Default)]
pub struct ServerVariables {
    variables: IndexMap<String, ServerVariable>,
}

impl ServerVariables {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable. An empty `enum_values` slice means any value.
    #[must_use]
    pub fn add_server_var(
        mut self,
        name: impl Into<String>,
        enum_values: &[&str],
        default: impl Into<String>,
        description: Option<&str>,
    ) -> Self {
        self.variables.insert(
            name.into(),
            ServerVariable {
                enum_values: enum_values.iter().map(|v| (*v).to_string()).collect(),
                default: default.into(),
                description: description.map(str::to_string),
            },
        );
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> IndexMap<String, ServerVariable> {
        self.variables
    }
}
