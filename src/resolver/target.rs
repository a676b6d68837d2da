//! Parsed redirect targets and the published routing variables.

use url::Url;

use crate::resolver::error::ResolveError;

/// The parsed result of a lookup: where the resource actually lives.
///
/// Derived entirely from the raw URL string returned by the lookup service;
/// lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct RedirectTarget {
    /// The full resolved URL.
    pub url: Url,
    /// Hostname without port.
    pub host: String,
    /// Port, explicit or defaulted by scheme.
    pub port: u16,
    /// Path component of the resolved URL.
    pub path: String,
    /// Percent-decoded query, empty when the URL carries none.
    pub query: String,
}

impl RedirectTarget {
    /// Parse the raw lookup body into a target.
    ///
    /// The body must be exactly one absolute URL. When the URL carries no
    /// explicit port the port is defaulted by scheme (`http` → 80,
    /// `https` → 443); any other scheme without a port is rejected.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let url = Url::parse(raw)
            .map_err(|e| ResolveError::malformed(format!("cannot parse {raw:?}: {e}")))?;

        let host = url
            .host_str()
            .ok_or_else(|| ResolveError::malformed(format!("no host in {raw:?}")))?
            .to_string();

        let port = match url.port() {
            Some(p) => p,
            None => match url.scheme() {
                "http" => 80,
                "https" => 443,
                other => {
                    return Err(ResolveError::malformed(format!(
                        "no port and no default for scheme {other:?}"
                    )))
                }
            },
        };

        let query = match url.query() {
            Some(raw_query) => urlencoding::decode(raw_query)
                .map_err(|e| ResolveError::malformed(format!("cannot decode query: {e}")))?
                .into_owned(),
            None => String::new(),
        };

        let path = url.path().to_string();

        Ok(Self {
            url,
            host,
            port,
            path,
            query,
        })
    }

    /// `host:port`, never without a port.
    pub fn host_port(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The five routing variables published for a single request.
///
/// Inserted into the request extensions by the resolver middleware and
/// read-only for every later stage in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingVariables {
    /// Full resolved URL.
    pub url: String,
    /// Resolved host.
    pub host: String,
    /// Resolved `host:port`.
    pub host_port: String,
    /// Resolved path.
    pub path: String,
    /// Resolved decoded query.
    pub query: String,
}

impl From<&RedirectTarget> for RoutingVariables {
    fn from(target: &RedirectTarget) -> Self {
        Self {
            url: target.url.to_string(),
            host: target.host.clone(),
            host_port: target.host_port(),
            path: target.path.clone(),
            query: target.query.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_port_preserved() {
        let target = RedirectTarget::parse("https://node-7.internal:9443/stream/abc?x=1").unwrap();
        assert_eq!(target.host, "node-7.internal");
        assert_eq!(target.port, 9443);
        assert_eq!(target.host_port(), "node-7.internal:9443");
        assert_eq!(target.path, "/stream/abc");
        assert_eq!(target.query, "x=1");
    }

    #[test]
    fn test_port_defaults_by_scheme() {
        let target = RedirectTarget::parse("http://node-3.internal/stream/abc").unwrap();
        assert_eq!(target.port, 80);
        assert_eq!(target.host_port(), "node-3.internal:80");

        let target = RedirectTarget::parse("https://node-3.internal/stream/abc").unwrap();
        assert_eq!(target.port, 443);
        assert_eq!(target.host_port(), "node-3.internal:443");
    }

    #[test]
    fn test_unknown_scheme_without_port_rejected() {
        let err = RedirectTarget::parse("ftp://node-3.internal/file").unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));

        // With an explicit port the scheme does not matter.
        let target = RedirectTarget::parse("ftp://node-3.internal:2121/file").unwrap();
        assert_eq!(target.port, 2121);
    }

    #[test]
    fn test_query_is_percent_decoded() {
        let target = RedirectTarget::parse("http://host:8080/p?name=a%20b&x=%2Fy").unwrap();
        assert_eq!(target.query, "name=a b&x=/y");
    }

    #[test]
    fn test_missing_query_is_empty_string() {
        let target = RedirectTarget::parse("http://host:8080/p").unwrap();
        assert_eq!(target.query, "");
    }

    #[test]
    fn test_garbage_body_rejected() {
        let err = RedirectTarget::parse("not a url::::").unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
    }

    #[test]
    fn test_url_without_host_rejected() {
        let err = RedirectTarget::parse("unix:/run/service.sock").unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
    }

    #[test]
    fn test_routing_variables_mirror_target() {
        let target = RedirectTarget::parse("https://node-7.internal:9443/stream/abc?x=1").unwrap();
        let vars = RoutingVariables::from(&target);
        assert_eq!(vars.url, "https://node-7.internal:9443/stream/abc?x=1");
        assert_eq!(vars.host, "node-7.internal");
        assert_eq!(vars.host_port, "node-7.internal:9443");
        assert_eq!(vars.path, "/stream/abc");
        assert_eq!(vars.query, "x=1");
    }
}
