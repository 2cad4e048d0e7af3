mod cloudinary;
mod database;
mod hashing;
mod jwt;
mod myconfig;
mod redis;

pub use self::cloudinary::{Cloudinary, CloudinaryConfig};
pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::hashing::Hashing;
pub use self::jwt::{Claims, JwtConfig, Role};
pub use self::myconfig::{AdminCredentials, Config, CorsConfig};
pub use self::redis::RedisClient;
