use super::dto::ApiKey;

/// First Fetch version that addresses topics by id.
pub const FETCH_TOPIC_ID_MIN_VERSION: i16 = 13;

/// Authorized-operations bitfield reported for every described topic.
pub const TOPIC_AUTHORIZED_OPERATIONS: i32 = 0x0DF8;

/// Nullable cursor byte meaning "no more results".
pub const NULL_CURSOR: u8 = 0xff;

/// Request frames above this size close the connection.
pub const MAX_FRAME_SIZE: i32 = 100 * 1024 * 1024;

/// Name of the first segment file in every partition directory.
pub const FIRST_SEGMENT_FILE: &str = "00000000000000000000.log";
pub const METADATA_TOPIC_DIR: &str = "__cluster_metadata-0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedApi {
    pub key: ApiKey,
    pub min_version: i16,
    pub max_version: i16,
}

impl SupportedApi {
    pub fn supports(&self, version: i16) -> bool {
        (self.min_version..=self.max_version).contains(&version)
    }
}

/// Static dispatch table advertised by ApiVersions, in ascending key order.
pub const SUPPORTED_APIS: &[SupportedApi] = &[
    SupportedApi {
        key: ApiKey::Fetch,
        min_version: 0,
        max_version: 16,
    },
    SupportedApi {
        key: ApiKey::ApiVersions,
        min_version: 0,
        max_version: 4,
    },
    SupportedApi {
        key: ApiKey::DescribeTopicPartitions,
        min_version: 0,
        max_version: 0,
    },
];

pub fn supported_api(key: ApiKey) -> Option<&'static SupportedApi> {
    SUPPORTED_APIS.iter().find(|api| api.key == key)
}
