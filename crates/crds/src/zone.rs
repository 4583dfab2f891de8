//! Zone CRD
//!
//! Declarative schema for a Cloudflare zone and its settings. Zones are not
//! reconciled yet; the type exists so manifests validate against the CRD and
//! so the provider can route them once a zone client exists.

use crate::conditions::{Condition, ConditionedStatus};
use crate::managed::{DeletionPolicy, Managed};
use crate::references::{ProviderConfigReference, Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "zone.cloudflare.crossplane.io",
    version = "v1alpha1",
    kind = "Zone",
    status = "ZoneStatus",
    category = "crossplane",
    category = "managed",
    category = "cloudflare",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME","type":"string","jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSpec {
    pub for_provider: ZoneParameters,

    #[serde(default)]
    pub provider_config_ref: ProviderConfigReference,

    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneParameters {
    /// Domain name of the zone. Immutable.
    #[schemars(
        length(max = 253),
        regex(
            pattern = r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)*[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$"
        )
    )]
    pub name: String,

    /// Try to import existing DNS records when the zone is created. Immutable.
    #[serde(default)]
    pub jump_start: bool,

    /// Only use Cloudflare DNS services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,

    /// Plan the zone is subscribed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,

    /// Full or partial (CNAME) setup. Immutable.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<ZoneType>,

    #[serde(default)]
    pub settings: ZoneSettings,

    /// Domains to use for custom nameservers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vanity_name_servers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ref: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_selector: Option<Selector>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    #[default]
    Full,
    Partial,
}

/// An on/off zone setting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Off,
    On,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheLevel {
    Bypass,
    Basic,
    Simplified,
    Aggressive,
    CacheEverything,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CnameFlattening {
    FlattenAtRoot,
    FlattenAll,
    FlattenNone,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum MinTlsVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Polish {
    Off,
    Lossless,
    Lossy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PseudoIpv4 {
    Off,
    AddHeader,
    OverwriteHeader,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Off,
    EssentiallyOff,
    Low,
    Medium,
    High,
    UnderAttack,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SslMode {
    Off,
    Flexible,
    Full,
    Strict,
    OriginPull,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tls13 {
    Off,
    On,
    Zrt,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MinifySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<Toggle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MobileRedirectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Toggle>,

    /// Subdomain prefix mobile devices are redirected to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,

    /// Drop the path from the URI when redirecting
    #[serde(rename = "stripURI", default, skip_serializing_if = "Option::is_none")]
    pub strip_uri: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StrictTransportSecuritySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_subdomains: Option<bool>,
    /// Send `X-Content-Type-Options: nosniff`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_sniff: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityHeaderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_transport_security: Option<StrictTransportSecuritySettings>,
}

/// Zone settings. Every field is optional; unset fields are left as
/// Cloudflare has them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_online: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_ddos: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_use_https: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_https_rewrites: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brotli: Option<Toggle>,

    /// Browser cache TTL in seconds, 0 respects existing headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(extend("enum" = [
        0, 30, 60, 300, 1200, 1800, 3600, 7200, 10800, 14400, 18000, 28800, 43200, 57600, 72000,
        86400, 172800, 259200, 345600, 432000, 691200, 1382400, 2073600, 2678400, 5356800,
        16070400, 31536000
    ]))]
    pub browser_cache_ttl: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_check: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_level: Option<CacheLevel>,

    /// Challenge TTL in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(extend("enum" = [
        300, 900, 1800, 2700, 3600, 7200, 10800, 14400, 28800, 57600, 86400, 604800, 2592000,
        31536000
    ]))]
    pub challenge_ttl: Option<i64>,

    /// Ciphers allowed for TLS termination
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ciphers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname_flattening: Option<CnameFlattening>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_mode: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_cache_ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_obfuscation: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotlink_protection: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http2: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http3: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_geolocation: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_to_cloudflare: Option<Toggle>,

    /// Maximum upload payload size in MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<MinifySettings>,
    #[serde(rename = "minTLSVersion", default, skip_serializing_if = "Option::is_none")]
    pub min_tls_version: Option<MinTlsVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirage: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_redirect: Option<MobileRedirectSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunistic_encryption: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunistic_onion: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orange_to_orange: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_error_page_pass_thru: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polish: Option<Polish>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_preload: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_pass: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudo_ipv4: Option<PseudoIpv4>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_buffering: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rocket_loader: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_header: Option<SecurityHeaderSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_level: Option<SecurityLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_side_exclude: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_query_string_for_cache: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls13: Option<Tls13>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_auth: Option<Toggle>,
    #[serde(rename = "trueClientIPHeader", default, skip_serializing_if = "Option::is_none")]
    pub true_client_ip_header: Option<Toggle>,
    #[serde(rename = "visitorIP", default, skip_serializing_if = "Option::is_none")]
    pub visitor_ip: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waf: Option<Toggle>,
    #[serde(rename = "webP", default, skip_serializing_if = "Option::is_none")]
    pub webp: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_sockets: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_rtt: Option<Toggle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    #[serde(default)]
    pub at_provider: ZoneObservation,
}

/// Read-only zone fields reported by Cloudflare
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,

    /// Seconds left in development mode if positive, otherwise seconds since
    /// it expired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_mode_timer: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original_name_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_registrar: Option<String>,
    #[serde(rename = "originalDNSHost", default, skip_serializing_if = "Option::is_none")]
    pub original_dns_host: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_pending_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_pending: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub betas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vanity_name_servers: Vec<String>,
}

impl ConditionedStatus for ZoneStatus {
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}

impl Managed for Zone {
    type Status = ZoneStatus;

    fn provider_config_ref(&self) -> &ProviderConfigReference {
        &self.spec.provider_config_ref
    }

    fn deletion_policy(&self) -> DeletionPolicy {
        self.spec.deletion_policy
    }

    fn managed_status(&self) -> Option<&ZoneStatus> {
        self.status.as_ref()
    }

    fn managed_status_mut(&mut self) -> &mut ZoneStatus {
        self.status.get_or_insert_with(Default::default)
    }
}
