use crate::catalog::domain::{ComponentType, CreatedProduct, ProductPayload};
use crate::ports::outbound::{MetaobjectMatch, MetaobjectRepository, ProductRepository};
use crate::shared::error::CatalogError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Results requested per metaobject search.
const SEARCH_PAGE_SIZE: u32 = 10;

/// Metaobject field holding the human-readable name.
const DISPLAY_FIELD_KEY: &str = "name";

const SEARCH_METAOBJECTS: &str = r#"
query SearchMetaobjects($type: String!, $query: String!, $first: Int!) {
  metaobjects(type: $type, first: $first, query: $query) {
    nodes { id displayName }
  }
}"#;

const CREATE_METAOBJECT: &str = r#"
mutation CreateMetaobject($metaobject: MetaobjectCreateInput!) {
  metaobjectCreate(metaobject: $metaobject) {
    metaobject { id displayName }
    userErrors { field message }
  }
}"#;

const CREATE_PRODUCT: &str = r#"
mutation CreateProduct($product: ProductCreateInput!, $media: [CreateMediaInput!]) {
  productCreate(product: $product, media: $media) {
    product { id handle }
    userErrors { field message }
  }
}"#;

const CREATE_VARIANTS: &str = r#"
mutation CreateVariants($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkCreate(productId: $productId, variants: $variants, strategy: REMOVE_STANDALONE_VARIANT) {
    productVariants { id }
    userErrors { field message }
  }
}"#;

const PUBLISH_PRODUCT: &str = r#"
mutation PublishProduct($id: ID!, $input: [PublicationInput!]!) {
  publishablePublish(id: $id, input: $input) {
    userErrors { field message }
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct UserError {
    #[serde(default)]
    field: Option<Vec<String>>,
    message: String,
}

impl UserError {
    fn describe(&self) -> String {
        match &self.field {
            Some(path) if !path.is_empty() => format!("{}: {}", path.join("."), self.message),
            _ => self.message.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaobjectNode {
    id: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    metaobjects: NodeList<MetaobjectNode>,
}

#[derive(Debug, Deserialize)]
struct NodeList<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMetaobjectData {
    metaobject_create: MutationPayload<MetaobjectNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductData {
    product_create: ProductCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductCreatePayload {
    product: Option<ProductNode>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct ProductNode {
    id: String,
    #[serde(default)]
    handle: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationPayload<T> {
    metaobject: Option<T>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserErrorsOnly {
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateVariantsData {
    product_variants_bulk_create: UserErrorsOnly,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishData {
    publishable_publish: UserErrorsOnly,
}

/// Connection settings for the admin API.
#[derive(Debug, Clone)]
pub struct ShopifyConnection {
    pub shop_domain: String,
    pub api_version: String,
    pub access_token: String,
}

/// ShopifyAdminClient adapter for the platform's GraphQL admin API
///
/// Implements both remote ports. Searches that fail in transport or with a
/// non-success HTTP status are retried a few times; mutations are sent
/// exactly once. Either way the final failure surfaces as
/// `CatalogError::RemoteUnavailable`. User errors returned by a mutation
/// surface as `CatalogError::RemoteRejected`.
pub struct ShopifyAdminClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    max_retries: u32,
}

impl ShopifyAdminClient {
    pub fn new(connection: ShopifyConnection) -> Result<Self> {
        Self::validate_domain(&connection.shop_domain)?;
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            connection.shop_domain.trim(),
            connection.api_version.trim()
        );
        Self::with_endpoint(endpoint, connection.access_token)
    }

    /// Client for an explicit GraphQL endpoint URL.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("catalog-mapper/{}", version))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            max_retries: 3,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn validate_domain(domain: &str) -> Result<()> {
        let domain = domain.trim();
        if domain.is_empty()
            || domain.contains(['/', '\\', '?', '#', '@', ' '])
            || domain.contains("..")
        {
            return Err(CatalogError::Validation {
                message: format!("'{}' is not a valid shop domain", domain),
            }
            .into());
        }
        Ok(())
    }

    /// Search syntax for an exact display-name phrase.
    fn search_query(text: &str) -> String {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        format!("display_name:\"{}\"", escaped)
    }

    /// Read-only query, retried up to `max_retries` times.
    async fn query<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        self.execute(operation, query, variables, self.max_retries)
            .await
    }

    /// Single attempt: a mutation whose response was lost may still have
    /// been applied.
    async fn mutate<T: DeserializeOwned>(
        &self,
        operation: &str,
        mutation: &str,
        variables: Value,
    ) -> Result<T> {
        self.execute(operation, mutation, variables, 1).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
        attempts: u32,
    ) -> Result<T> {
        let body = json!({ "query": query, "variables": variables });
        let mut last_error = String::new();

        for attempt in 1..=attempts.max(1) {
            match self.post(&body).await {
                Ok(response) => return Self::unwrap_response(operation, response),
                Err(e) => {
                    tracing::debug!(operation, attempt, error = %e, "remote call failed");
                    last_error = e;
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(250 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(CatalogError::RemoteUnavailable {
            operation: operation.to_string(),
            details: last_error,
        }
        .into())
    }

    async fn post<T: DeserializeOwned>(
        &self,
        body: &Value,
    ) -> std::result::Result<GraphQlResponse<T>, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("admin API returned status code {}", response.status()));
        }
        response.json().await.map_err(|e| e.to_string())
    }

    fn unwrap_response<T>(operation: &str, response: GraphQlResponse<T>) -> Result<T> {
        if !response.errors.is_empty() {
            return Err(CatalogError::RemoteRejected {
                operation: operation.to_string(),
                messages: response.errors.into_iter().map(|e| e.message).collect(),
            }
            .into());
        }
        response.data.ok_or_else(|| {
            CatalogError::RemoteUnavailable {
                operation: operation.to_string(),
                details: "response carried no data".to_string(),
            }
            .into()
        })
    }

    fn reject_user_errors(operation: &str, errors: &[UserError]) -> Result<()> {
        if errors.is_empty() {
            return Ok(());
        }
        Err(CatalogError::RemoteRejected {
            operation: operation.to_string(),
            messages: errors.iter().map(UserError::describe).collect(),
        }
        .into())
    }

    fn product_input(payload: &ProductPayload) -> Value {
        let options: Vec<Value> = payload
            .options
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let mut values: Vec<Value> = Vec::new();
                for variant in &payload.variants {
                    if let Some(value) = variant.option_values.get(position) {
                        let value = json!({ "name": value });
                        if !values.contains(&value) {
                            values.push(value);
                        }
                    }
                }
                json!({ "name": name, "values": values })
            })
            .collect();

        let metafields: Vec<Value> = payload
            .metafields
            .iter()
            .map(|m| {
                json!({
                    "namespace": m.namespace,
                    "key": m.key,
                    "type": m.kind,
                    "value": m.value,
                })
            })
            .collect();

        json!({
            "title": payload.title,
            "vendor": payload.vendor,
            "productType": payload.product_type,
            "tags": payload.tags,
            "productOptions": options,
            "metafields": metafields,
            "collectionsToJoin": payload.collection_ids,
        })
    }

    fn variants_input(payload: &ProductPayload) -> Value {
        Value::Array(
            payload
                .variants
                .iter()
                .map(|variant| {
                    let option_values: Vec<Value> = payload
                        .options
                        .iter()
                        .zip(&variant.option_values)
                        .map(|(option, value)| json!({ "optionName": option, "name": value }))
                        .collect();
                    let mut input = json!({
                        "price": variant.price,
                        "optionValues": option_values,
                    });
                    if let Some(sku) = &variant.sku {
                        input["inventoryItem"] = json!({ "sku": sku });
                    }
                    input
                })
                .collect(),
        )
    }
}

#[async_trait]
impl MetaobjectRepository for ShopifyAdminClient {
    async fn search(
        &self,
        component_type: ComponentType,
        query: &str,
    ) -> Result<Vec<MetaobjectMatch>> {
        let data: SearchData = self
            .query(
                "metaobject search",
                SEARCH_METAOBJECTS,
                json!({
                    "type": component_type.as_str(),
                    "query": Self::search_query(query),
                    "first": SEARCH_PAGE_SIZE,
                }),
            )
            .await?;

        Ok(data
            .metaobjects
            .nodes
            .into_iter()
            .map(|node| MetaobjectMatch {
                id: node.id,
                display_name: node.display_name,
            })
            .collect())
    }

    async fn create(&self, component_type: ComponentType, display_name: &str) -> Result<String> {
        let operation = "metaobject create";
        let data: CreateMetaobjectData = self
            .mutate(
                operation,
                CREATE_METAOBJECT,
                json!({
                    "metaobject": {
                        "type": component_type.as_str(),
                        "fields": [{ "key": DISPLAY_FIELD_KEY, "value": display_name }],
                    }
                }),
            )
            .await?;

        let payload = data.metaobject_create;
        Self::reject_user_errors(operation, &payload.user_errors)?;
        payload.metaobject.map(|m| m.id).ok_or_else(|| {
            CatalogError::RemoteRejected {
                operation: operation.to_string(),
                messages: vec!["no metaobject returned".to_string()],
            }
            .into()
        })
    }
}

#[async_trait]
impl ProductRepository for ShopifyAdminClient {
    async fn create_product(&self, payload: &ProductPayload) -> Result<CreatedProduct> {
        let media: Vec<Value> = payload
            .image_urls
            .iter()
            .map(|url| json!({ "originalSource": url, "mediaContentType": "IMAGE" }))
            .collect();

        let data: CreateProductData = self
            .mutate(
                "product create",
                CREATE_PRODUCT,
                json!({ "product": Self::product_input(payload), "media": media }),
            )
            .await?;
        let created = data.product_create;
        Self::reject_user_errors("product create", &created.user_errors)?;
        let product = created.product.ok_or_else(|| CatalogError::RemoteRejected {
            operation: "product create".to_string(),
            messages: vec!["no product returned".to_string()],
        })?;

        if !payload.variants.is_empty() {
            let data: CreateVariantsData = self
                .mutate(
                    "variant create",
                    CREATE_VARIANTS,
                    json!({ "productId": product.id, "variants": Self::variants_input(payload) }),
                )
                .await?;
            Self::reject_user_errors(
                "variant create",
                &data.product_variants_bulk_create.user_errors,
            )?;
        }

        if !payload.channel_ids.is_empty() {
            let input: Vec<Value> = payload
                .channel_ids
                .iter()
                .map(|id| json!({ "publicationId": id }))
                .collect();
            let data: PublishData = self
                .mutate(
                    "product publish",
                    PUBLISH_PRODUCT,
                    json!({ "id": product.id, "input": input }),
                )
                .await?;
            Self::reject_user_errors("product publish", &data.publishable_publish.user_errors)?;
        }

        tracing::info!(product = %product.id, "created product");
        Ok(CreatedProduct {
            id: product.id,
            handle: product.handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{MetafieldInput, MetafieldValue, VariantInput};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Local endpoint answering every request with `status`; returns the
    /// URL and a counter of requests received.
    fn failing_endpoint(status: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/graphql.json", listener.local_addr().unwrap());
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                drain_request(&stream);
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = write!(
                    stream,
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
            }
        });
        (url, requests)
    }

    fn drain_request(stream: &TcpStream) {
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                return;
            }
            let header = line.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0; content_length];
        let _ = reader.read_exact(&mut body);
    }

    fn is_unavailable(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::RemoteUnavailable { .. })
        )
    }

    #[tokio::test]
    async fn test_search_is_retried_on_server_errors() {
        let (url, requests) = failing_endpoint("503 Service Unavailable");
        let client = ShopifyAdminClient::with_endpoint(url, "shpat_test").unwrap();

        let err = client
            .search(ComponentType::Vga, "RTX 4060")
            .await
            .unwrap_err();
        assert!(is_unavailable(&err));
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_metaobject_create_is_sent_once() {
        let (url, requests) = failing_endpoint("503 Service Unavailable");
        let client = ShopifyAdminClient::with_endpoint(url, "shpat_test").unwrap();

        let err = client
            .create(ComponentType::Vga, "NVIDIA GeForce RTX 4060 8GB")
            .await
            .unwrap_err();
        assert!(is_unavailable(&err));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_product_create_is_sent_once() {
        let (url, requests) = failing_endpoint("504 Gateway Timeout");
        let client = ShopifyAdminClient::with_endpoint(url, "shpat_test").unwrap();

        let payload = ProductPayload {
            title: "iPhone 15 Pro Max 256GB [Desert Titanium]".to_string(),
            vendor: "Apple".to_string(),
            product_type: "Smartphone".to_string(),
            tags: vec![],
            options: vec!["Color".to_string()],
            variants: vec![VariantInput {
                price: "999.00".to_string(),
                sku: None,
                option_values: vec!["Desert Titanium".to_string()],
            }],
            metafields: vec![],
            collection_ids: vec![],
            channel_ids: vec!["gid://shopify/Publication/1".to_string()],
            image_urls: vec![],
        };
        let err = client.create_product(&payload).await.unwrap_err();
        assert!(is_unavailable(&err));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    fn connection(domain: &str) -> ShopifyConnection {
        ShopifyConnection {
            shop_domain: domain.to_string(),
            api_version: "2024-10".to_string(),
            access_token: "shpat_test".to_string(),
        }
    }

    #[test]
    fn test_endpoint_from_domain() {
        let client = ShopifyAdminClient::new(connection("example.myshopify.com")).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.myshopify.com/admin/api/2024-10/graphql.json"
        );
    }

    #[test]
    fn test_rejects_unsafe_domains() {
        for domain in ["", "evil.com/path", "a@b.com", "shop..com", "x?y"] {
            assert!(ShopifyAdminClient::new(connection(domain)).is_err(), "{}", domain);
        }
    }

    #[test]
    fn test_search_query_escapes_quotes() {
        assert_eq!(
            ShopifyAdminClient::search_query(r#"15.6" FHD"#),
            r#"display_name:"15.6\" FHD""#
        );
    }

    #[test]
    fn test_graphql_errors_are_rejections() {
        let response: GraphQlResponse<SearchData> = serde_json::from_str(
            r#"{"data": null, "errors": [{"message": "Access denied"}]}"#,
        )
        .unwrap();
        let err = ShopifyAdminClient::unwrap_response("metaobject search", response).unwrap_err();
        match err.downcast_ref::<CatalogError>() {
            Some(CatalogError::RemoteRejected { messages, .. }) => {
                assert_eq!(messages, &vec!["Access denied".to_string()])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_search_response_parses_nodes() {
        let response: GraphQlResponse<SearchData> = serde_json::from_str(
            r#"{"data": {"metaobjects": {"nodes": [
                {"id": "gid://shopify/Metaobject/1", "displayName": "RTX 4060"}
            ]}}}"#,
        )
        .unwrap();
        let data = ShopifyAdminClient::unwrap_response("metaobject search", response).unwrap();
        assert_eq!(data.metaobjects.nodes[0].display_name, "RTX 4060");
    }

    #[test]
    fn test_user_errors_carry_field_path() {
        let errors = vec![UserError {
            field: Some(vec!["metaobject".to_string(), "type".to_string()]),
            message: "is invalid".to_string(),
        }];
        let err = ShopifyAdminClient::reject_user_errors("metaobject create", &errors).unwrap_err();
        assert!(err.to_string().contains("metaobject.type: is invalid"));
    }

    #[test]
    fn test_product_input_shape() {
        let payload = ProductPayload {
            title: "iPhone 15 Pro Max 256GB [Desert Titanium]".to_string(),
            vendor: "Apple".to_string(),
            product_type: "Smartphone".to_string(),
            tags: vec!["used".to_string()],
            options: vec!["Color".to_string()],
            variants: vec![VariantInput {
                price: "999.00".to_string(),
                sku: Some("IP15PM-256-DT".to_string()),
                option_values: vec!["Desert Titanium".to_string()],
            }],
            metafields: vec![MetafieldInput::reference(
                "storage",
                &MetafieldValue::Reference("gid://shopify/Metaobject/2".to_string()),
            )],
            collection_ids: vec!["gid://shopify/Collection/1".to_string()],
            channel_ids: vec![],
            image_urls: vec![],
        };

        let input = ShopifyAdminClient::product_input(&payload);
        assert_eq!(input["productType"], "Smartphone");
        assert_eq!(input["productOptions"][0]["values"][0]["name"], "Desert Titanium");
        assert_eq!(input["metafields"][0]["type"], "metaobject_reference");

        let variants = ShopifyAdminClient::variants_input(&payload);
        assert_eq!(variants[0]["inventoryItem"]["sku"], "IP15PM-256-DT");
        assert_eq!(variants[0]["optionValues"][0]["optionName"], "Color");
    }
}
