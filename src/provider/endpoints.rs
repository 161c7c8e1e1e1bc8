use super::error::{ProviderError, ProviderResult};
use serde::Deserialize;
use url::Url;

const DATABASE_API_VERSION: &str = "20160918";
const COMPUTE_API_VERSION: &str = "20160918";
const MYSQL_API_VERSION: &str = "20190415";

/// Optional per-service root URLs (`scheme://host[:port]`), replacing the
/// region-derived defaults. The API version path is appended automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointOverrides {
    pub database: Option<String>,
    pub compute: Option<String>,
    pub mysql: Option<String>,
}

/// Versioned base URLs of the three services used by occctl. Every URL ends
/// with a `/` so resource paths can be joined onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub database: Url,
    pub compute: Url,
    pub mysql: Url,
}

impl ServiceEndpoints {
    pub fn resolve(region: &str, overrides: &EndpointOverrides) -> ProviderResult<Self> {
        let database_root = overrides
            .database
            .clone()
            .unwrap_or_else(|| format!("https://database.{}.oraclecloud.com", region));
        let compute_root = overrides
            .compute
            .clone()
            .unwrap_or_else(|| format!("https://iaas.{}.oraclecloud.com", region));
        let mysql_root = overrides
            .mysql
            .clone()
            .unwrap_or_else(|| format!("https://mysql.{}.ocp.oraclecloud.com", region));

        Ok(Self {
            database: versioned(&database_root, DATABASE_API_VERSION)?,
            compute: versioned(&compute_root, COMPUTE_API_VERSION)?,
            mysql: versioned(&mysql_root, MYSQL_API_VERSION)?,
        })
    }
}

fn versioned(root: &str, version: &str) -> ProviderResult<Url> {
    let mut root = root.trim().to_string();
    if !root.ends_with('/') {
        root.push('/');
    }
    let base = Url::parse(&root)
        .map_err(|e| ProviderError::Endpoint(format!("'{}': {}", root, e)))?;
    if base.host_str().is_none() {
        return Err(ProviderError::Endpoint(format!("'{}' has no host", root)));
    }
    base.join(&format!("{}/", version))
        .map_err(|e| ProviderError::Endpoint(format!("'{}': {}", root, e)))
}

/// Appends `segments` to a versioned base URL. Each segment is percent-encoded
/// on its own, so identifiers can never add path levels, a query or a fragment.
pub fn resource_url(base: &Url, segments: &[&str]) -> ProviderResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ProviderError::Endpoint(format!("'{}' cannot take a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_endpoints() {
        let endpoints = ServiceEndpoints::resolve("us-ashburn-1", &EndpointOverrides::default()).unwrap();
        assert_eq!(
            endpoints.database.as_str(),
            "https://database.us-ashburn-1.oraclecloud.com/20160918/"
        );
        assert_eq!(
            endpoints.compute.as_str(),
            "https://iaas.us-ashburn-1.oraclecloud.com/20160918/"
        );
        assert_eq!(
            endpoints.mysql.as_str(),
            "https://mysql.us-ashburn-1.ocp.oraclecloud.com/20190415/"
        );
    }

    #[test]
    fn test_overrides_keep_version_path() {
        let overrides = EndpointOverrides {
            mysql: Some("http://127.0.0.1:8080".to_string()),
            ..Default::default()
        };
        let endpoints = ServiceEndpoints::resolve("eu-frankfurt-1", &overrides).unwrap();
        assert_eq!(endpoints.mysql.as_str(), "http://127.0.0.1:8080/20190415/");
        assert!(endpoints.database.as_str().contains("eu-frankfurt-1"));

        let url = resource_url(
            &endpoints.mysql,
            &["dbSystems", "ocid1.mysqldbsystem.oc1..x", "actions", "start"],
        )
        .unwrap();
        assert_eq!(
            url.path(),
            "/20190415/dbSystems/ocid1.mysqldbsystem.oc1..x/actions/start"
        );
    }

    #[test]
    fn test_identifier_stays_one_segment() {
        let endpoints =
            ServiceEndpoints::resolve("us-ashburn-1", &EndpointOverrides::default()).unwrap();
        let url = resource_url(
            &endpoints.mysql,
            &["dbSystems", "ocid1.x#prod/../../instances?a=b", "actions", "start"],
        )
        .unwrap();
        assert_eq!(
            url.path(),
            "/20190415/dbSystems/ocid1.x%23prod%2F..%2F..%2Finstances%3Fa=b/actions/start"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_override() {
        let overrides = EndpointOverrides {
            compute: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ServiceEndpoints::resolve("us-phoenix-1", &overrides),
            Err(ProviderError::Endpoint(_))
        ));
    }
}
