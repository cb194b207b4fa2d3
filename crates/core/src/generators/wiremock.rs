//! Provisions a WireMock service in a blackbox harness
//!
//! Adds the `wiremock` service to the harness docker-compose file, wires it as
//! a dependency of the tested project's service, drops a pre-configured REST
//! client stub into the harness sources and registers the client package.
//! Safe to re-run: the compose mutations are idempotent.

use crate::compose::{
    add_depends_on, add_service_from_template, tested_project_service_mut, update_compose,
    APP_NAME_BUILD_ARG,
};
use crate::configs::versions::DependencyVersions;
use crate::generators::{add_dev_dependencies, GeneratorCallback};
use crate::registry::read_project_configuration;
use crate::templates::{generate_files, TemplateFile, TemplateVars};
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

pub const WIREMOCK_SERVICE_NAME: &str = "wiremock";

const WIREMOCK_SERVICE_TEMPLATE: &str = include_str!("wiremock/assets/wiremock-service.yaml");

const WIREMOCK_FILES: &[TemplateFile] = &[TemplateFile {
    path: "src/wiremock.ts__tmpl__",
    contents: include_str!("wiremock/files/src/wiremock.ts__tmpl__"),
}];

#[derive(Debug, Clone)]
pub struct WiremockOptions {
    /// Name of the blackbox harness project to provision
    pub project: String,
}

pub async fn wiremock_generator(
    tree: &mut Tree,
    options: WiremockOptions,
    versions: &DependencyVersions,
) -> RiggerResult<GeneratorCallback> {
    let project = options.project.clone();
    update_compose(tree, &options.project, |compose| {
        let tested_service = tested_project_service_mut(compose).ok_or_else(|| {
            RiggerError::Validation(format!(
                "no service with an {APP_NAME_BUILD_ARG} build arg found in the \
                 docker-compose file of '{project}'"
            ))
        })?;

        add_depends_on(tested_service, WIREMOCK_SERVICE_NAME);

        add_service_from_template(
            compose,
            WIREMOCK_SERVICE_NAME,
            WIREMOCK_SERVICE_TEMPLATE,
            &TemplateVars::new(),
        )
    })?;

    let config = read_project_configuration(tree, &options.project)?;
    generate_files(tree, WIREMOCK_FILES, &config.root, &TemplateVars::new())?;

    add_dev_dependencies(
        tree,
        &[("wiremock-rest-client", &versions.wiremock_rest_client)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::read_compose;
    use crate::documents;
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
        wiremock_generator(
            &mut tree,
            WiremockOptions {
                project: BLACKBOX_PROJECT.to_string(),
            },
            &DependencyVersions::default(),
        )
        .await
        .unwrap();
        tree
    }

    #[tokio::test]
    async fn adds_the_service_to_docker_compose() {
        let tree = setup().await;
        let compose = read_compose(&tree, BLACKBOX_PROJECT).unwrap();
        assert!(compose.services.contains_key(WIREMOCK_SERVICE_NAME));
    }

    #[tokio::test]
    async fn adds_the_service_as_dependency_of_the_tested_project() {
        let tree = setup().await;
        let compose = read_compose(&tree, BLACKBOX_PROJECT).unwrap();
        assert_eq!(
            compose.services[PROJECT].depends_on,
            vec![WIREMOCK_SERVICE_NAME]
        );
    }

    #[tokio::test]
    async fn running_twice_does_not_duplicate_anything() {
        let mut tree = setup().await;
        wiremock_generator(
            &mut tree,
            WiremockOptions {
                project: BLACKBOX_PROJECT.to_string(),
            },
            &DependencyVersions::default(),
        )
        .await
        .unwrap();

        let compose = read_compose(&tree, BLACKBOX_PROJECT).unwrap();
        assert_eq!(
            compose.services[PROJECT].depends_on,
            vec![WIREMOCK_SERVICE_NAME]
        );
        assert_eq!(
            compose
                .services
                .keys()
                .filter(|name| *name == WIREMOCK_SERVICE_NAME)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn registers_the_rest_client_package() {
        let tree = setup().await;
        let package_json: serde_json::Value =
            documents::read_json(&tree, "package.json").unwrap();
        assert_eq!(
            package_json["devDependencies"]["wiremock-rest-client"],
            DependencyVersions::default().wiremock_rest_client
        );
    }

    #[tokio::test]
    async fn adds_the_client_stub_source() {
        let tree = setup().await;
        assert!(tree.exists(format!("apps/{BLACKBOX_PROJECT}/src/wiremock.ts")));
    }

    #[tokio::test]
    async fn fails_when_the_harness_has_no_tested_service() {
        let mut tree = Tree::new("/virtual-workspace");
        node_application(
            &mut tree,
            &NodeApplicationOptions {
                project_name: "plain".to_string(),
                project_root: "apps/plain".to_string(),
                tags: Vec::new(),
            },
        )
        .unwrap();
        tree.write("apps/plain/docker-compose.yaml", "services: {}\n");

        let err = wiremock_generator(
            &mut tree,
            WiremockOptions {
                project: "plain".to_string(),
            },
            &DependencyVersions::default(),
        )
        .await
        .err()
        .unwrap();

        assert!(matches!(err, RiggerError::Validation(_)));
    }
}
