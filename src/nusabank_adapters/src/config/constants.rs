pub const DEFAULT_REDIS_HOST_NAME: &str = "127.0.0.1";
