// Session handling and wire decoding of the Emporia client, exercised
// against an in-process fake of the vendor cloud.

use chrono::{TimeZone, Utc};
use emporia_api::emporia::{Scale, VueClient};
use emporia_api::AppError;
use std::sync::atomic::Ordering;
use tokio_test::{assert_err, assert_ok};

use test_helpers::spawn_mock_cloud;

#[tokio::test]
async fn session_is_cached_across_calls() {
    let cloud = spawn_mock_cloud().await;
    let client = VueClient::new(&cloud.emporia_config("Lord"));

    assert_ok!(client.get_devices().await);
    assert_ok!(client.get_devices().await);

    assert_eq!(cloud.state.token_hits.load(Ordering::SeqCst), 1);
    assert_eq!(cloud.state.devices_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_first_requests_login_once() {
    let cloud = spawn_mock_cloud().await;
    let client = VueClient::new(&cloud.emporia_config("Lord"));

    let (first, second) = tokio::join!(client.ensure_session(), client.ensure_session());
    assert_ok!(first);
    assert_ok!(second);

    assert_eq!(cloud.state.token_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_session_triggers_relogin() {
    let cloud = spawn_mock_cloud().await;
    // Lifetime below the refresh margin, so the token expires at once.
    *cloud.state.expires_in.lock().unwrap() = 30;
    let client = VueClient::new(&cloud.emporia_config("Lord"));

    assert_ok!(client.get_devices().await);
    assert_ok!(client.get_devices().await);

    assert_eq!(cloud.state.token_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_login_leaves_next_attempt_free() {
    let cloud = spawn_mock_cloud().await;
    let mut config = cloud.emporia_config("Lord");
    config.password = "wrong".to_string();
    let client = VueClient::new(&config);

    let err = assert_err!(client.get_devices().await);
    assert!(matches!(err, AppError::Auth(_)));

    let err = assert_err!(client.get_devices().await);
    assert!(matches!(err, AppError::Auth(_)));

    assert_eq!(cloud.state.token_hits.load(Ordering::SeqCst), 2);
    assert_eq!(cloud.state.devices_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn decodes_device_list() {
    let cloud = spawn_mock_cloud().await;
    let client = VueClient::new(&cloud.emporia_config("Lord"));

    let devices = client.get_devices().await.unwrap();
    assert_eq!(devices.len(), 2);

    let lord = devices
        .iter()
        .find(|device| device.device_name == "Lord")
        .unwrap();
    assert_eq!(lord.device_gid, 1234);
    assert_eq!(lord.channels[0].channel_num, "1,2,3");
    assert_eq!(lord.channels[0].name.as_deref(), Some("Mains"));
}

#[tokio::test]
async fn instant_usage_is_keyed_by_gid_and_channel() {
    let cloud = spawn_mock_cloud().await;
    let client = VueClient::new(&cloud.emporia_config("Lord"));

    let usage = client
        .get_device_list_usage(&[1234], Utc::now(), Scale::Minute)
        .await
        .unwrap();

    let device = usage.get(&1234).unwrap();
    assert_eq!(device.channels["1,2,3"].usage, Some(0.041));
    assert_eq!(device.channels["2"].usage, Some(0.003));
}

#[tokio::test]
async fn chart_usage_preserves_null_buckets() {
    let cloud = spawn_mock_cloud().await;
    *cloud.state.chart_usage.lock().unwrap() = vec![None, Some(1.5), None];
    let client = VueClient::new(&cloud.emporia_config("Lord"));

    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap();
    let chart = client
        .get_chart_usage(1234, "1,2,3", start, end, Scale::Hour)
        .await
        .unwrap();

    assert_eq!(chart.usage, vec![None, Some(1.5), None]);
    assert_eq!(
        cloud.state.chart_scales.lock().unwrap().as_slice(),
        ["HOUR"]
    );
}
