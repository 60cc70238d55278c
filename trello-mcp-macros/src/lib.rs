//! Procedural macros for trello-mcp
//!
//! This crate provides the `#[trello_tool]` attribute macro for defining Trello MCP tools
//! with minimal boilerplate.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Arguments for the `#[trello_tool]` attribute
#[derive(Debug, FromMeta)]
struct TrelloToolArgs {
    /// Tool name (e.g., "create_card")
    name: String,
    /// Tool description for MCP
    description: String,
    /// Tool category: "boards", "lists", or "cards"
    category: String,
    /// Operation type: "read", "write", or "delete"
    operation: String,
}

/// Attribute macro for Trello MCP tools.
///
/// This macro generates:
/// - `ToolInfo` trait implementation (name, description, category, operation_type)
/// - JSON Schema for input arguments via schemars
/// - Automatically adds `#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]`
///
/// # Example
///
/// ```ignore
/// #[trello_tool(
///     name = "create_card",
///     description = "Create a new card in a list",
///     category = "cards",
///     operation = "write"
/// )]
/// pub struct CreateCard {
///     /// List ID the card is created in
///     pub list_id: String,
///     /// Card name
///     pub name: String,
///     /// Card description (optional)
///     #[serde(default)]
///     pub description: Option<String>,
/// }
///
/// #[async_trait]
/// impl ToolExecutor for CreateCard {
///     async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
///         // Gate the operation before execute() runs
///     }
///
///     async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
///         // Your implementation here
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn trello_tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.to_compile_error()),
    };

    let args = match TrelloToolArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let input = parse_macro_input!(item as DeriveInput);
    let expanded = impl_trello_tool(&args, &input);

    TokenStream::from(expanded)
}

fn impl_trello_tool(args: &TrelloToolArgs, input: &DeriveInput) -> TokenStream2 {
    let struct_name = &input.ident;
    let tool_name = &args.name;
    let description = &args.description;
    let category = &args.category;
    let operation = &args.operation;

    // Convert category string to ToolCategory variant
    let category_variant = match category.as_str() {
        "boards" => quote! { crate::tools::ToolCategory::Boards },
        "lists" => quote! { crate::tools::ToolCategory::Lists },
        "cards" => quote! { crate::tools::ToolCategory::Cards },
        _ => {
            return syn::Error::new_spanned(
                input,
                format!("Unknown category: {}. Use: boards, lists, or cards", category),
            )
            .to_compile_error();
        }
    };

    // Convert operation string to OperationType variant
    let operation_variant = match operation.as_str() {
        "read" => quote! { crate::tools::OperationType::Read },
        "write" => quote! { crate::tools::OperationType::Write },
        "delete" => quote! { crate::tools::OperationType::Delete },
        _ => {
            return syn::Error::new_spanned(
                input,
                format!(
                    "Unknown operation: {}. Use: read, write, or delete",
                    operation
                ),
            )
            .to_compile_error();
        }
    };

    // Get the visibility, attributes (except our own), and struct body
    let vis = &input.vis;
    let attrs: Vec<_> = input.attrs.iter().collect();
    let generics = &input.generics;

    // Extract fields from the struct
    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    input,
                    "trello_tool only supports structs with named fields",
                )
                .to_compile_error();
            }
        },
        _ => {
            return syn::Error::new_spanned(input, "trello_tool only supports structs")
                .to_compile_error();
        }
    };

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
        #vis struct #struct_name #generics {
            #fields
        }

        impl crate::tools::ToolInfo for #struct_name {
            fn name() -> &'static str {
                #tool_name
            }

            fn description() -> &'static str {
                #description
            }

            fn category() -> crate::tools::ToolCategory {
                #category_variant
            }

            fn operation_type() -> crate::tools::OperationType {
                #operation_variant
            }
        }
    }
}
