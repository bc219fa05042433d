use aws_config::SdkConfig;
use aws_sdk_ec2::config::Region;

/// Loads SDK configuration for a named credential profile. An explicit region
/// overrides whatever the profile specifies.
pub(super) async fn get_config(profile: &str, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::from_env().profile_name(profile);
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
