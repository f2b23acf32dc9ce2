use super::{AssembleMetafieldsUseCase, DecodeTemplateUseCase};
use crate::application::dto::{AssemblyRequest, PublishRequest, PublishResponse};
use crate::application::services::MissingEntryTracker;
use crate::catalog::domain::{
    AssemblyOutcome, DecodedTemplate, MetafieldInput, ProductPayload, VariantInput,
};
use crate::catalog::policies::MatchPolicy;
use crate::ports::outbound::{
    ComponentCatalog, MissingEntryStore, ProductRepository, SpecificationRepository,
};
use crate::shared::error::CatalogError;
use crate::shared::Result;

/// PublishProductUseCase - Decodes, assembles and uploads one product
///
/// Values without a catalog entry are published as literal text and stay
/// in the missing-entry log. The tracker's session list is cleared only
/// after the platform accepted the product.
///
/// # Type Parameters
/// * `S` - SpecificationRepository implementation
/// * `C` - ComponentCatalog implementation
/// * `M` - MissingEntryStore behind the tracker
/// * `P` - ProductRepository implementation
pub struct PublishProductUseCase<'t, S, C, M, P>
where
    S: SpecificationRepository,
    C: ComponentCatalog,
    M: MissingEntryStore,
    P: ProductRepository,
{
    decoder: DecodeTemplateUseCase<S>,
    assembler: AssembleMetafieldsUseCase<C, &'t MissingEntryTracker<M>>,
    tracker: &'t MissingEntryTracker<M>,
    products: P,
}

impl<'t, S, C, M, P> PublishProductUseCase<'t, S, C, M, P>
where
    S: SpecificationRepository,
    C: ComponentCatalog,
    M: MissingEntryStore,
    P: ProductRepository,
{
    pub fn new(
        specs: S,
        catalog: C,
        tracker: &'t MissingEntryTracker<M>,
        products: P,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            decoder: DecodeTemplateUseCase::new(specs, policy),
            assembler: AssembleMetafieldsUseCase::new(catalog, tracker),
            tracker,
            products,
        }
    }

    pub async fn execute(&self, request: PublishRequest) -> Result<PublishResponse> {
        let price = normalize_price(&request.price)?;
        let decoded = self.decoder.execute(&request.template)?.ok_or_else(|| {
            CatalogError::Validation {
                message: format!("template not recognized: {}", request.template),
            }
        })?;

        let assembly = AssemblyRequest::from_decoded(&decoded)
            .with_extra_fields(request.extra_fields.clone());
        let outcome = self.assembler.execute(&assembly)?;
        if !outcome.is_complete() {
            tracing::info!(
                missing = outcome.missing_count(),
                "publishing with literal fallbacks for unmapped values"
            );
        }

        let payload = build_payload(&request, &decoded, &outcome, price);
        let product = self.products.create_product(&payload).await?;
        tracing::info!(id = %product.id, title = %payload.title, "product published");
        self.tracker.clear_session();

        Ok(PublishResponse {
            product,
            payload,
            missing: outcome.missing,
        })
    }
}

/// Validates a price and renders it with two decimals.
fn normalize_price(price: &str) -> Result<String> {
    let parsed: f64 = price.trim().parse().map_err(|_| CatalogError::Validation {
        message: format!("price must be a decimal number, got '{}'", price),
    })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(CatalogError::Validation {
            message: format!("price must be zero or positive, got '{}'", price),
        }
        .into());
    }
    Ok(format!("{:.2}", parsed))
}

fn build_payload(
    request: &PublishRequest,
    decoded: &DecodedTemplate,
    outcome: &AssemblyOutcome,
    price: String,
) -> ProductPayload {
    let mut metafields: Vec<MetafieldInput> = outcome
        .resolved
        .iter()
        .map(|(key, value)| MetafieldInput::reference(key, value))
        .collect();
    metafields.extend(
        outcome
            .literals
            .iter()
            .map(|(key, text)| MetafieldInput::literal(key, text)),
    );

    ProductPayload {
        title: request
            .title
            .clone()
            .unwrap_or_else(|| decoded.template.trim().to_string()),
        vendor: decoded.brand.clone(),
        product_type: decoded.category.clone().unwrap_or_default(),
        tags: request.tags.clone(),
        options: vec!["Color".to_string()],
        variants: vec![VariantInput {
            price,
            sku: request.sku.clone(),
            option_values: vec![decoded.color.clone()],
        }],
        metafields,
        collection_ids: request.collection_ids.clone(),
        channel_ids: request.channel_ids.clone(),
        image_urls: request.image_urls.clone(),
    }
}
