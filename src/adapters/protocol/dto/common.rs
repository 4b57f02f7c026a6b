#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i16)]
pub enum ErrorCode {
    None = 0,
    UnknownTopicOrPartition = 3,
    UnsupportedVersion = 35,
    UnknownTopicId = 100,
}

impl From<ErrorCode> for i16 {
    fn from(error_code: ErrorCode) -> Self {
        error_code as i16
    }
}

/// API keys this broker answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ApiKey {
    Fetch = 1,
    ApiVersions = 18,
    DescribeTopicPartitions = 75,
}

impl TryFrom<i16> for ApiKey {
    type Error = i16;

    fn try_from(key: i16) -> Result<Self, Self::Error> {
        match key {
            1 => Ok(ApiKey::Fetch),
            18 => Ok(ApiKey::ApiVersions),
            75 => Ok(ApiKey::DescribeTopicPartitions),
            other => Err(other),
        }
    }
}

impl ApiKey {
    /// ApiVersions keeps header v0 so old clients can always read it.
    pub fn response_header_version(self) -> ResponseHeaderVersion {
        match self {
            ApiKey::ApiVersions => ResponseHeaderVersion::V0,
            ApiKey::Fetch | ApiKey::DescribeTopicPartitions => ResponseHeaderVersion::V1,
        }
    }
}

impl From<ApiKey> for i16 {
    fn from(key: ApiKey) -> Self {
        key as i16
    }
}

/// Response header layout: v0 is the bare correlation id, v1 adds a tag buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseHeaderVersion {
    V0,
    V1,
}
