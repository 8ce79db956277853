/// Data space subsystem: membership repository, authenticated info client
/// and the membership resolution service
pub mod info_client;
pub mod membership;
pub mod service;

pub use info_client::{DataSpaceInfo, HubInfoClient};
pub use membership::MembershipRepository;
pub use service::{
    DataSpaceService, DataSpaceView, CONNECTORS_SVC_SUFFIX, DS_INFO_SVC_SUFFIX,
};
