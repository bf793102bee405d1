/*
 * Responsibility
 * - Public interface of the middleware
 *   - auth::requires_auth: per-route permission guard
 *   - cors / http: router-wide layers
 */
pub mod auth;
pub mod cors;
pub mod http;
