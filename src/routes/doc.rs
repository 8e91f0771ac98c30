use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            ClaimsView, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
            ResetPasswordRequest,
        },
        cart::{AddToCartRequest, CartSummary, QuantityChange},
        comments::{AddCommentRequest, CommentList},
        dashboard::{ActivityEntry, AdminDashboard, DashboardRoute, UserDashboard},
        likes::LikeStatus,
        products::{CreateProductRequest, ProductDetail, ProductList, ViewerState},
        users::UpdatePhotoRequest,
    },
    models::{CartItem, Comment, Product, Role, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, dashboard, health, params, products, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        auth::forgot_password,
        auth::reset_password,
        auth::claims,
        products::list_products,
        products::get_product,
        products::like_status,
        products::like_product,
        products::unlike_product,
        products::toggle_like,
        products::list_comments,
        products::add_comment,
        cart::cart_list,
        cart::add_to_cart,
        cart::change_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        users::me,
        users::update_photo,
        dashboard::dashboard_route,
        dashboard::user_dashboard,
        dashboard::admin_dashboard,
        admin::list_products,
        admin::create_product,
        admin::delete_product
    ),
    components(
        schemas(
            Role,
            User,
            Product,
            Comment,
            CartItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            ClaimsView,
            CreateProductRequest,
            ProductList,
            ProductDetail,
            ViewerState,
            LikeStatus,
            AddCommentRequest,
            CommentList,
            AddToCartRequest,
            QuantityChange,
            CartSummary,
            UpdatePhotoRequest,
            DashboardRoute,
            UserDashboard,
            AdminDashboard,
            ActivityEntry,
            params::Pagination,
            params::ProductQuery,
            params::ProductSortBy,
            params::SortOrder,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<ProductDetail>,
            ApiResponse<CartSummary>,
            ApiResponse<LikeStatus>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and password reset"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Likes", description = "Product like endpoints"),
        (name = "Comments", description = "Product comment endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Users", description = "Own profile endpoints"),
        (name = "Dashboard", description = "Role dashboards"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
