//! Fixed client-facing messages. Responses never carry anything outside this set
//! for access-control outcomes.

// Access control
pub const UNAUTHORIZED_REQUEST: &str = "Unauthorized request";
pub const SERVER_ERROR: &str = "Server error";
pub const DATABASE_CONN_ERROR: &str = "Connection error";
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable";
pub const SERVER_MAINTENANCE: &str =
    "Maintenance: Server is undergoing service upgrade. Please return later";

// Server
pub const WELCOME: &str = "Welcome to FBS API";
pub const NOTHING_TO_DO: &str = "Nothing to do here.";

// User
pub const USER_SIGNIN_FAILED: &str = "Invalid email and/or password";
pub const USER_SIGNIN_SUCCESS: &str = "Signed in success";
pub const USER_SIGNED_OUT: &str = "You have logged out";
pub const USER_CREATE_SUCCESS: &str = "User created";
pub const USER_EMAIL_TAKEN: &str = "Email already in use";

// Airline
pub const AIRLINE_CREATE_SUCCESS: &str = "Airline information created";
pub const AIRLINE_FETCH_SUCCESS: &str = "Airline information fetched";
pub const AIRLINE_CODE_TAKEN: &str = "Airline code already registered";
pub const AIRLINE_NOT_FOUND: &str = "Airline not found";

// Package
pub const PACKAGE_CREATE_SUCCESS: &str = "Package created";
pub const PACKAGE_FETCH_SUCCESS: &str = "Packages fetched";
pub const PACKAGE_NOT_FOUND: &str = "Package not found";

// Cart
pub const CART_ADD_SUCCESS: &str = "Package added to cart";
pub const CART_FETCH_SUCCESS: &str = "Cart fetched";
pub const CART_REMOVE_SUCCESS: &str = "Package removed from cart";
pub const CART_ITEM_NOT_FOUND: &str = "Package is not in cart";
pub const CART_EMPTY: &str = "Cart is empty";

// Checkout
pub const CHECKOUT_SUCCESS: &str = "Order placed";
pub const CHECKOUT_SEATS_UNAVAILABLE: &str = "Not enough seats left on package";
pub const CART_QUANTITY_EXCEEDS_SEATS: &str = "Requested quantity exceeds remaining seats";
pub const CART_TOTAL_TOO_LARGE: &str = "Cart total is too large";
