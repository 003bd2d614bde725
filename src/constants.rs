pub const APP_NAME: &str = "Open WebUI";

// Shipped as the default background. Carries tracking query parameters from
// wherever it was copied; treat it as opaque data.
pub const DEFAULT_BACKGROUND_IMAGE_URL: &str = "https://images.pexels.com/photos/772429/pexels-photo-772429.jpeg?_gl=1*xzpfvm*_ga*MjU4MTg2MDU4LjE3NTI3MDA5MDI.*_ga_8JE65Q40S6*czE3NTI3MDgzNzMkbzIkZzEkdDE3NTI3MDg0MzkkajYwJGwwJGgw";

pub const DEFAULT_THEME: &str = "system";
pub const DEFAULT_LANDING_PAGE_MODE: &str = "chat";
