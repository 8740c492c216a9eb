use agentkit_core::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScaleParams {
    /// Grams called for by the recipe
    pub grams: f64,
    /// Multiplier for the batch size
    pub factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScaleResponse {
    pub grams: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConvertParams {
    pub celsius: f64,
}

#[derive(Clone)]
pub struct KitchenTools;

#[tools(
    scale_ingredient = "Scale an ingredient quantity",
    convert_temperature = "Convert an oven temperature to Fahrenheit"
)]
impl KitchenTools {
    async fn scale_ingredient(&self, params: ScaleParams) -> Result<ScaleResponse, ToolError> {
        if params.factor <= 0.0 {
            return Err(ToolError::InvalidInput("factor must be positive".into()));
        }
        Ok(ScaleResponse {
            grams: params.grams * params.factor,
        })
    }

    async fn convert_temperature(&self, params: ConvertParams) -> String {
        format!("{:.0}F", params.celsius * 9.0 / 5.0 + 32.0)
    }

    // Not listed in the attribute, so no tool is generated for it.
    #[allow(dead_code)]
    async fn helper(&self, x: i32) -> i32 {
        x * x
    }
}

#[tokio::test]
async fn test_generated_tool_executes() {
    let tool = KitchenToolsScaleIngredient(KitchenTools);

    assert_eq!(<KitchenToolsScaleIngredient as ToolFunction>::name(), "scale_ingredient");
    assert_eq!(
        <KitchenToolsScaleIngredient as ToolFunction>::description(),
        "Scale an ingredient quantity"
    );

    let result = ToolFunction::execute(
        &tool,
        ScaleParams {
            grams: 250.0,
            factor: 2.0,
        },
    )
    .await
    .unwrap();
    assert_eq!(result, ScaleResponse { grams: 500.0 });
}

#[tokio::test]
async fn test_generated_tool_propagates_errors() {
    let tool = KitchenToolsScaleIngredient(KitchenTools);
    let err = ToolFunction::execute(
        &tool,
        ScaleParams {
            grams: 250.0,
            factor: 0.0,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, ToolError::InvalidInput("factor must be positive".into()));
}

#[test]
fn test_parameters_schema_comes_from_schemars() {
    let schema = <KitchenToolsScaleIngredient as ToolFunction>::parameters_schema();

    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["grams"]["type"], "number");
    assert_eq!(
        schema["properties"]["grams"]["description"],
        "Grams called for by the recipe"
    );
    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(required.contains(&"grams") && required.contains(&"factor"));
}

#[tokio::test]
async fn test_toolbox_invokes_by_name() {
    let toolbox = ToolBox::new()
        .with_tool(KitchenToolsScaleIngredient(KitchenTools))
        .with_tool(KitchenToolsConvertTemperature(KitchenTools));

    assert_eq!(toolbox.len(), 2);
    assert_eq!(
        toolbox.names(),
        vec!["scale_ingredient", "convert_temperature"]
    );

    let scaled = toolbox
        .invoke("scale_ingredient", r#"{"grams": 100, "factor": 1.5}"#)
        .await
        .unwrap();
    assert_eq!(scaled, r#"{"grams":150.0}"#);

    // Bare values are bound as text, so numeric parameters need an object.
    let converted = toolbox.invoke("convert_temperature", "200").await.unwrap_err();
    assert!(matches!(converted, ToolError::InvalidInput(_)));
    let converted = toolbox
        .invoke("convert_temperature", r#"{"celsius": 200}"#)
        .await
        .unwrap();
    // String responses come back verbatim.
    assert_eq!(converted, "392F");
}

#[test]
fn test_toolbox_rejects_bad_input() {
    let toolbox = ToolBox::new().with_tool(KitchenToolsScaleIngredient(KitchenTools));

    let err = tokio_test::block_on(toolbox.invoke("missing", "{}")).unwrap_err();
    assert!(matches!(err, ToolError::InvalidInput(_)));

    let err = tokio_test::block_on(toolbox.invoke("scale_ingredient", "two cups")).unwrap_err();
    assert!(matches!(err, ToolError::InvalidInput(_)));

    let description = toolbox.describe();
    assert_eq!(
        description,
        "scale_ingredient: Scale an ingredient quantity Input must be a JSON object with keys: factor, grams."
    );
}
