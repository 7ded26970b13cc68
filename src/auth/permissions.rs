// src/auth/permissions.rs
//
// Role -> permission table. Handlers ask for permission strings like
// "orders.create" instead of comparing role names inline.

pub const SHOPS_MANAGE: &str = "shops.manage";
pub const CUSTOMERS_MANAGE: &str = "customers.manage";
pub const PRODUCTS_MANAGE: &str = "products.manage";
pub const ORDERS_CREATE: &str = "orders.create";
pub const ORDERS_UPDATE: &str = "orders.update";
pub const ORDERS_DELETE: &str = "orders.delete";
pub const PAYMENTS_CREATE: &str = "payments.create";
pub const PAYMENTS_DELETE: &str = "payments.delete";
pub const STATS_VIEW: &str = "stats.view";
pub const USERS_MANAGE: &str = "users.manage";

const ADMIN_PERMISSIONS: &[&str] = &[
    SHOPS_MANAGE,
    CUSTOMERS_MANAGE,
    PRODUCTS_MANAGE,
    ORDERS_CREATE,
    ORDERS_UPDATE,
    ORDERS_DELETE,
    PAYMENTS_CREATE,
    PAYMENTS_DELETE,
    STATS_VIEW,
    USERS_MANAGE,
];

const MANAGER_PERMISSIONS: &[&str] = &[
    SHOPS_MANAGE,
    CUSTOMERS_MANAGE,
    PRODUCTS_MANAGE,
    ORDERS_CREATE,
    ORDERS_UPDATE,
    ORDERS_DELETE,
    PAYMENTS_CREATE,
    PAYMENTS_DELETE,
    STATS_VIEW,
];

const STAFF_PERMISSIONS: &[&str] = &[
    CUSTOMERS_MANAGE,
    ORDERS_CREATE,
    PAYMENTS_CREATE,
    STATS_VIEW,
];

pub fn role_permissions(role: &str) -> &'static [&'static str] {
    match role {
        "admin" => ADMIN_PERMISSIONS,
        "manager" => MANAGER_PERMISSIONS,
        "staff" => STAFF_PERMISSIONS,
        _ => &[],
    }
}

pub fn is_valid_role(role: &str) -> bool {
    matches!(role, "admin" | "manager" | "staff")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_every_permission() {
        for perm in MANAGER_PERMISSIONS.iter().chain(STAFF_PERMISSIONS) {
            assert!(role_permissions("admin").contains(perm));
        }
        assert!(role_permissions("admin").contains(&USERS_MANAGE));
    }

    #[test]
    fn manager_cannot_manage_users() {
        assert!(!role_permissions("manager").contains(&USERS_MANAGE));
        assert!(role_permissions("manager").contains(&ORDERS_DELETE));
    }

    #[test]
    fn staff_is_limited_to_daily_operations() {
        let perms = role_permissions("staff");
        assert!(perms.contains(&ORDERS_CREATE));
        assert!(perms.contains(&PAYMENTS_CREATE));
        assert!(!perms.contains(&SHOPS_MANAGE));
        assert!(!perms.contains(&ORDERS_DELETE));
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        assert!(role_permissions("supervisor").is_empty());
    }
}
