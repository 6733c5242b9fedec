//! Google Sheets v4 implementation of the spreadsheet API

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};

use crate::api::{SpreadsheetApi, SpreadsheetConnector, Worksheet};
use crate::credentials::ServiceAccountKey;
use crate::error::{Result, SheetsError};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Handle to one spreadsheet, authorised with a bearer token
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    client: Client,
    access_token: String,
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: u32,
    #[serde(default)]
    grid_properties: Option<GridProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridProperties {
    #[serde(default)]
    row_count: u32,
    #[serde(default)]
    column_count: u32,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

impl From<SheetProperties> for Worksheet {
    fn from(props: SheetProperties) -> Self {
        let (row_count, column_count) = props
            .grid_properties
            .map(|grid| (grid.row_count, grid.column_count))
            .unwrap_or_default();

        Worksheet {
            sheet_id: props.sheet_id,
            title: props.title,
            index: props.index,
            row_count,
            column_count,
        }
    }
}

/// Quote a sheet title for use in an A1 range
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1 range covering the whole worksheet
pub fn sheet_range(title: &str) -> String {
    quote_sheet_title(title)
}

/// A1 range anchored at the top-left cell of the worksheet
pub fn top_left_range(title: &str) -> String {
    format!("{}!A1", quote_sheet_title(title))
}

/// Pull Google's error message out of an error response body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

impl GoogleSheetsClient {
    /// Create a client for a spreadsheet with an already issued access token
    pub fn new(client: Client, access_token: String, spreadsheet_id: String) -> Self {
        Self { client, access_token, spreadsheet_id }
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/{}", SHEETS_API_BASE, self.spreadsheet_id)
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/values/{}", self.spreadsheet_url(), urlencoding::encode(range))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(response)
    }

    async fn batch_update(&self, requests: Vec<Value>) -> Result<BatchUpdateResponse> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        let request = self.client.post(&url).json(&json!({ "requests": requests }));
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Confirm the spreadsheet exists and the token can read it
    pub async fn verify(&self) -> Result<()> {
        self.worksheets().await.map(|_| ())
    }
}

#[async_trait]
impl SpreadsheetApi for GoogleSheetsClient {
    async fn update_title(&self, title: &str) -> Result<()> {
        self.batch_update(vec![json!({
            "updateSpreadsheetProperties": {
                "properties": { "title": title },
                "fields": "title"
            }
        })])
        .await?;

        debug!("Renamed spreadsheet {} to '{}'", self.spreadsheet_id, title);
        Ok(())
    }

    async fn worksheets(&self) -> Result<Vec<Worksheet>> {
        let request = self
            .client
            .get(self.spreadsheet_url())
            .query(&[("fields", "sheets.properties")]);
        let meta: SpreadsheetMeta = self.send(request).await?.json().await?;

        let mut worksheets: Vec<Worksheet> =
            meta.sheets.into_iter().map(|entry| entry.properties.into()).collect();
        worksheets.sort_by_key(|ws| ws.index);
        Ok(worksheets)
    }

    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<Worksheet> {
        let response = self
            .batch_update(vec![json!({
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            })])
            .await?;

        let properties = response
            .replies
            .into_iter()
            .next()
            .map(|reply| reply["addSheet"]["properties"].clone())
            .ok_or_else(|| SheetsError::Api {
                status: 200,
                message: "addSheet returned no reply".to_string(),
            })?;
        let props: SheetProperties = serde_json::from_value(properties)?;

        info!("Added worksheet '{}' ({}x{})", title, rows, cols);
        Ok(props.into())
    }

    async fn delete_worksheet(&self, worksheet: &Worksheet) -> Result<()> {
        self.batch_update(vec![json!({ "deleteSheet": { "sheetId": worksheet.sheet_id } })]).await?;
        debug!("Deleted worksheet '{}'", worksheet.title);
        Ok(())
    }

    async fn clear_worksheet(&self, worksheet: &Worksheet) -> Result<()> {
        let url = format!("{}:clear", self.values_url(&sheet_range(&worksheet.title)));
        self.send(self.client.post(&url).json(&json!({}))).await?;
        debug!("Cleared worksheet '{}'", worksheet.title);
        Ok(())
    }

    async fn resize_worksheet(
        &self,
        worksheet: &Worksheet,
        rows: u32,
        cols: u32,
    ) -> Result<Worksheet> {
        self.batch_update(vec![json!({
            "updateSheetProperties": {
                "properties": {
                    "sheetId": worksheet.sheet_id,
                    "gridProperties": { "rowCount": rows, "columnCount": cols }
                },
                "fields": "gridProperties(rowCount,columnCount)"
            }
        })])
        .await?;

        debug!("Resized worksheet '{}' to {}x{}", worksheet.title, rows, cols);
        Ok(Worksheet { row_count: rows, column_count: cols, ..worksheet.clone() })
    }

    async fn write_rows(&self, worksheet: &Worksheet, rows: &[Vec<String>]) -> Result<()> {
        let range = top_left_range(&worksheet.title);
        let request = self
            .client
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "range": range, "majorDimension": "ROWS", "values": rows }));
        self.send(request).await?;

        debug!("Wrote {} rows to '{}'", rows.len(), worksheet.title);
        Ok(())
    }
}

/// Opens spreadsheets with a service-account key file
#[derive(Debug, Clone)]
pub struct GoogleConnector {
    client: Client,
}

impl GoogleConnector {
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SpreadsheetConnector for GoogleConnector {
    async fn open(
        &self,
        credentials_file: &Path,
        spreadsheet_id: &str,
    ) -> Result<Box<dyn SpreadsheetApi>> {
        if credentials_file.as_os_str().is_empty() {
            return Err(SheetsError::InvalidArgument("credentials file path is empty".to_string()));
        }
        if spreadsheet_id.is_empty() {
            return Err(SheetsError::InvalidArgument("spreadsheet id is empty".to_string()));
        }

        let key = ServiceAccountKey::from_file(credentials_file)?;
        let token = key.fetch_token(&self.client).await?;

        let sheets = GoogleSheetsClient::new(
            self.client.clone(),
            token.access_token,
            spreadsheet_id.to_string(),
        );
        sheets.verify().await?;

        info!("Opened spreadsheet {}", spreadsheet_id);
        Ok(Box::new(sheets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_sheet_title() {
        assert_eq!(
            quote_sheet_title("Squad Standard Stats_stats_squads_standard_for"),
            "'Squad Standard Stats_stats_squads_standard_for'"
        );
        assert_eq!(quote_sheet_title("Manager's Picks_x"), "'Manager''s Picks_x'");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(sheet_range("Sheet1"), "'Sheet1'");
        assert_eq!(top_left_range("Sheet1"), "'Sheet1'!A1");
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = GoogleSheetsClient::new(Client::new(), "token".to_string(), "abc".to_string());
        assert_eq!(
            client.values_url("'League Table_results'!A1"),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/%27League%20Table_results%27%21A1"
        );
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(api_error_message(body), "The caller does not have permission");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_parse_sheet_properties() {
        let meta: SpreadsheetMeta = serde_json::from_value(json!({
            "sheets": [
                { "properties": { "sheetId": 42, "title": "Second", "index": 1,
                    "gridProperties": { "rowCount": 100, "columnCount": 20 } } },
                { "properties": { "sheetId": 0, "title": "Sheet1", "index": 0,
                    "gridProperties": { "rowCount": 1000, "columnCount": 26 } } }
            ]
        }))
        .unwrap();

        let worksheets: Vec<Worksheet> =
            meta.sheets.into_iter().map(|entry| entry.properties.into()).collect();
        assert_eq!(worksheets.len(), 2);
        assert_eq!(worksheets[0].sheet_id, 42);
        assert_eq!(worksheets[0].row_count, 100);
        assert_eq!(worksheets[1].title, "Sheet1");
        assert_eq!(worksheets[1].column_count, 26);
    }

    #[tokio::test]
    async fn test_connector_rejects_empty_arguments() {
        let connector = GoogleConnector::new().unwrap();

        let err = connector.open(Path::new(""), "sheet-id").await.err().unwrap();
        assert!(matches!(err, SheetsError::InvalidArgument(_)));

        let err = connector.open(Path::new("creds.json"), "").await.err().unwrap();
        assert!(matches!(err, SheetsError::InvalidArgument(_)));
    }
}
