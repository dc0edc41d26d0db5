mod session;
mod toggles;
