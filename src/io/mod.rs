pub mod ods_read;
