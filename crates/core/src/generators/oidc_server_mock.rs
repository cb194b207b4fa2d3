//! Provisions an OIDC server mock in a blackbox harness
//!
//! Same shape as the WireMock generator: add the `oidc-server-mock` service to
//! the harness docker-compose file and make the tested project's service
//! depend on it. The mock's inline client configuration is templated with the
//! tested project's name, so tokens it issues carry the right audience.

use crate::compose::{
    add_depends_on, add_service_from_template, tested_project_name, tested_project_service_mut,
    update_compose, APP_NAME_BUILD_ARG,
};
use crate::templates::TemplateVars;
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

pub const OIDC_SERVER_MOCK_SERVICE_NAME: &str = "oidc-server-mock";

const OIDC_SERVICE_TEMPLATE: &str =
    include_str!("oidc_server_mock/assets/oidc-server-mock-service.yaml");

#[derive(Debug, Clone)]
pub struct OidcServerMockOptions {
    /// Name of the blackbox harness project to provision
    pub project: String,
}

pub async fn oidc_server_mock_generator(
    tree: &mut Tree,
    options: OidcServerMockOptions,
) -> RiggerResult<()> {
    let project = options.project.clone();
    update_compose(tree, &options.project, |compose| {
        let tested_service = tested_project_service_mut(compose).ok_or_else(|| {
            RiggerError::Validation(format!(
                "no service with an {APP_NAME_BUILD_ARG} build arg found in the \
                 docker-compose file of '{project}'"
            ))
        })?;

        add_depends_on(tested_service, OIDC_SERVER_MOCK_SERVICE_NAME);

        let tested_name = tested_project_name(tested_service)
            .map(str::to_string)
            .unwrap_or_default();

        let mut vars = TemplateVars::new();
        vars.insert("serviceName".to_string(), tested_name);

        add_service_from_template(
            compose,
            OIDC_SERVER_MOCK_SERVICE_NAME,
            OIDC_SERVICE_TEMPLATE,
            &vars,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::read_compose;
    use crate::generators::base::{node_application, NodeApplicationOptions};
    use crate::generators::blackbox_project::{
        blackbox_project_generator, BlackboxProjectOptions,
    };

    const PROJECT: &str = "backend-project";
    const BLACKBOX_PROJECT: &str = "backend-project-e2e";

    async fn setup() -> Tree {
        let mut tree = Tree::new("/virtual-workspace");
        node_application(
            &mut tree,
            &NodeApplicationOptions {
                project_name: PROJECT.to_string(),
                project_root: format!("apps/{PROJECT}"),
                tags: Vec::new(),
            },
        )
        .unwrap();
        blackbox_project_generator(
            &mut tree,
            BlackboxProjectOptions {
                project: PROJECT.to_string(),
                port: None,
                name: None,
                directory: None,
                tags: None,
            },
        )
        .await
        .unwrap();
        oidc_server_mock_generator(
            &mut tree,
            OidcServerMockOptions {
                project: BLACKBOX_PROJECT.to_string(),
            },
        )
        .await
        .unwrap();
        tree
    }

    #[tokio::test]
    async fn adds_the_mock_service_and_dependency_edge() {
        let tree = setup().await;
        let compose = read_compose(&tree, BLACKBOX_PROJECT).unwrap();

        assert!(compose
            .services
            .contains_key(OIDC_SERVER_MOCK_SERVICE_NAME));
        assert_eq!(
            compose.services[PROJECT].depends_on,
            vec![OIDC_SERVER_MOCK_SERVICE_NAME]
        );
    }

    #[tokio::test]
    async fn templates_the_tested_project_into_the_client_config() {
        let tree = setup().await;
        let compose = read_compose(&tree, BLACKBOX_PROJECT).unwrap();

        let service = &compose.services[OIDC_SERVER_MOCK_SERVICE_NAME];
        let environment = serde_yaml::to_string(service.environment.as_ref().unwrap()).unwrap();
        assert!(environment.contains(PROJECT));
    }

    #[tokio::test]
    async fn running_twice_is_idempotent() {
        let mut tree = setup().await;
        oidc_server_mock_generator(
            &mut tree,
            OidcServerMockOptions {
                project: BLACKBOX_PROJECT.to_string(),
            },
        )
        .await
        .unwrap();

        let compose = read_compose(&tree, BLACKBOX_PROJECT).unwrap();
        assert_eq!(
            compose.services[PROJECT].depends_on,
            vec![OIDC_SERVER_MOCK_SERVICE_NAME]
        );
    }
}
