use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoticeboardItem {
    pub pub_id: Option<i64>,
    #[serde(rename = "pubDT")]
    pub pub_dt: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub read_status: bool,
    pub evt_code: Option<String>,
    pub cnt_id: Option<i64>,
    pub cnt_valid_from: Option<String>,
    pub cnt_valid_to: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub cnt_valid_in_range: bool,
    pub cnt_status: Option<String>,
    pub cnt_title: Option<String>,
    pub cnt_category: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub cnt_has_attach: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub need_join: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub need_reply: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub need_file: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub attachments: Vec<NoticeboardAttachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoticeboardAttachment {
    pub file_name: Option<String>,
    pub attach_num: Option<i64>,
}
